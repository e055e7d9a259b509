//! Category view scanning.
//!
//! Category lists are live views, so every display refresh rescans the deck.

use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use deck_editor::cards::{Card, CardFace, ManaCost};
use deck_editor::category::{CategorySpec, Rgb};
use deck_editor::deck::Deck;
use deck_editor::filter::Filter;

fn build_deck(size: usize) -> Deck {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let types = ["Land", "Creature", "Instant", "Sorcery", "Artifact"];
    let mut deck = Deck::new();

    for i in 0..size {
        let face = CardFace::new(format!("Card {i}"))
            .with_cost(ManaCost::parse(&format!("{{{}}}{{G}}", i % 6)).unwrap_or_default())
            .with_types(&[], &[types[i % types.len()]], &[])
            .with_text(if i % 3 == 0 { "Add {G}." } else { "Draw a card." });
        deck.add(&Arc::new(Card::new(format!("card-{i}").as_str(), face)), 1 + (i % 4) as u32, date);
    }

    let filters = [
        "<type any \"Land\">",
        "<and <type any \"Creature\"> <cmc le 2>>",
        "<or <text contains \"add {g}\"> <type any \"Artifact\">>",
        "<and <type none \"Land\"> <cmc ge 4>>",
    ];
    for (i, filter) in filters.iter().enumerate() {
        let filter: Filter = filter.parse().unwrap_or_default();
        if let Ok(spec) = CategorySpec::new(format!("Category {i}"), Rgb::default(), filter) {
            let _ = deck.add_category(spec, None);
        }
    }
    deck
}

fn bench_category_totals(c: &mut Criterion) {
    let deck = build_deck(250);

    c.bench_function("category_totals_250", |b| {
        b.iter(|| {
            let total: u32 = deck
                .categories()
                .filter_map(|spec| deck.category_list(spec.name()).ok())
                .map(|view| view.total())
                .sum();
            black_box(total)
        })
    });
}

fn bench_categories_of(c: &mut Criterion) {
    let deck = build_deck(250);

    c.bench_function("categories_of_250", |b| {
        b.iter(|| {
            let memberships: usize = deck
                .entries()
                .iter()
                .map(|entry| deck.categories_of(&entry.card).len())
                .sum();
            black_box(memberships)
        })
    });
}

criterion_group!(benches, bench_category_totals, bench_categories_of);
criterion_main!(benches);
