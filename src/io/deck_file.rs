//! JSON deck files.
//!
//! ```text
//! {
//!   "main": [{ "id": "...", "count": 4, "added": "2024-05-01" }],
//!   "sides": [{ "name": "Sideboard", "cards": [...] }],
//!   "categories": [{ "name": "Lands", "color": {"r":0,"g":128,"b":0},
//!                    "filter": "<type any \"Land\">", "rank": 0,
//!                    "whitelist": [], "blacklist": [] }],
//!   "changelog": "",
//!   "notes": ""
//! }
//! ```
//!
//! Cards are stored by id and resolved against an [`Inventory`] on load.
//! An id the inventory does not know is skipped with a warning; anything
//! else wrong with the file fails the whole load.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, Inventory};
use crate::category::{CategorySpec, Rgb};
use crate::deck::{Deck, DeckDocument, ListRef};
use crate::error::{Error, Result};
use crate::filter::Filter;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct EntryRecord {
    id: CardId,
    count: u32,
    added: NaiveDate,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct SideRecord {
    name: String,
    #[serde(default)]
    cards: Vec<EntryRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CategoryRecord {
    name: String,
    #[serde(default)]
    color: Rgb,
    filter: Filter,
    rank: usize,
    #[serde(default)]
    whitelist: Vec<CardId>,
    #[serde(default)]
    blacklist: Vec<CardId>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct DeckRecord {
    main: Vec<EntryRecord>,
    sides: Vec<SideRecord>,
    categories: Vec<CategoryRecord>,
    changelog: String,
    notes: String,
}

/// Progress of a load, shared with the thread that runs it.
///
/// The loader bumps `processed` after every entry and checks the cancel
/// flag between entries.
#[derive(Debug, Default)]
pub struct LoadProgress {
    processed: AtomicUsize,
    total: AtomicUsize,
    cancelled: AtomicBool,
}

impl LoadProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries read so far.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }

    /// Entries in the file, known once it has been parsed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Fraction done in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => (self.processed() as f64 / total as f64).min(1.0),
        }
    }

    /// Ask the load to stop at the next entry.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn step(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.processed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// An entry that was skipped during a load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadWarning {
    pub list: ListRef,
    pub id: CardId,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown card {} in {}", self.id, self.list)
    }
}

/// A successfully loaded document and the entries it had to skip.
#[derive(Clone, Debug)]
pub struct LoadedDeck {
    pub document: DeckDocument,
    pub warnings: Vec<LoadWarning>,
}

fn read_entries(
    records: &[EntryRecord],
    list: &ListRef,
    deck: &mut Deck,
    inventory: &Inventory,
    progress: &LoadProgress,
    warnings: &mut Vec<LoadWarning>,
) -> Result<()> {
    for record in records {
        progress.step()?;
        match inventory.get(&record.id) {
            Some(card) => {
                if record.count > 0 && !deck.add(card, record.count, record.added) {
                    return Err(Error::CountOverflow {
                        list: list.to_string(),
                        count: u64::from(record.count),
                    });
                }
            }
            None => {
                warn!("skipping unknown card {} in {}", record.id, list);
                warnings.push(LoadWarning {
                    list: list.clone(),
                    id: record.id.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Read a deck document.
pub fn load<R: Read>(reader: R, inventory: &Inventory, progress: &LoadProgress) -> Result<LoadedDeck> {
    let record: DeckRecord =
        serde_json::from_reader(reader).map_err(|e| Error::format("deck file", e))?;

    let total = record.main.len() + record.sides.iter().map(|s| s.cards.len()).sum::<usize>();
    progress.total.store(total, Ordering::Relaxed);

    let mut document = DeckDocument::new();
    let mut warnings = Vec::new();

    read_entries(
        &record.main,
        &ListRef::Main,
        &mut document.main,
        inventory,
        progress,
        &mut warnings,
    )?;

    for side in &record.sides {
        let mut deck = Deck::new();
        let list = ListRef::side(side.name.as_str());
        read_entries(&side.cards, &list, &mut deck, inventory, progress, &mut warnings)?;
        document.insert_side(usize::MAX, side.name.as_str(), deck)?;
    }

    let mut categories = record.categories;
    categories.sort_by_key(|c| c.rank);
    for category in categories {
        let spec = CategorySpec::new(category.name, category.color, category.filter)?
            .with_overrides(category.whitelist, category.blacklist);
        document.main.add_category(spec, None)?;
    }

    document.changelog = record.changelog;
    document.notes = record.notes;

    debug!(
        "loaded deck: {} cards, {} side lists, {} categories, {} skipped",
        document.main.total(),
        document.side_count(),
        document.main.category_count(),
        warnings.len()
    );
    Ok(LoadedDeck { document, warnings })
}

/// Read a deck document from a file.
pub fn load_file(path: impl AsRef<Path>, inventory: &Inventory, progress: &LoadProgress) -> Result<LoadedDeck> {
    let file = File::open(path)?;
    load(BufReader::new(file), inventory, progress)
}

fn entry_records(deck: &Deck) -> Vec<EntryRecord> {
    deck.entries()
        .iter()
        .map(|entry| EntryRecord {
            id: entry.id().clone(),
            count: entry.count,
            added: entry.added,
        })
        .collect()
}

fn sorted_ids<'a>(ids: impl Iterator<Item = &'a CardId>) -> Vec<CardId> {
    let mut ids: Vec<CardId> = ids.cloned().collect();
    ids.sort();
    ids
}

/// Write a deck document.
pub fn save<W: Write>(writer: W, document: &DeckDocument) -> Result<()> {
    let record = DeckRecord {
        main: entry_records(&document.main),
        sides: document
            .sides()
            .map(|(name, deck)| SideRecord {
                name: name.to_string(),
                cards: entry_records(deck),
            })
            .collect(),
        categories: document
            .main
            .categories()
            .enumerate()
            .map(|(rank, spec)| CategoryRecord {
                name: spec.name().to_string(),
                color: spec.color(),
                filter: spec.filter().clone(),
                rank,
                whitelist: sorted_ids(spec.whitelist().iter()),
                blacklist: sorted_ids(spec.blacklist().iter()),
            })
            .collect(),
        changelog: document.changelog.clone(),
        notes: document.notes.clone(),
    };

    serde_json::to_writer_pretty(writer, &record).map_err(|e| Error::format("deck file", e))
}

/// Write a deck document to a file, replacing it.
///
/// The document goes to a hidden sibling file first and is renamed over
/// `path` only once fully written, so a failed save leaves the old file.
pub fn save_file(path: impl AsRef<Path>, document: &DeckDocument) -> Result<()> {
    let path = path.as_ref();
    let temp = sibling_temp_path(path);

    let result = write_file(&temp, document).and_then(|()| fs::rename(&temp, path).map_err(Error::from));
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

fn sibling_temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_file(path: &Path, document: &DeckDocument) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(&file);
    save(&mut writer, document)?;
    writer.flush()?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::{Card, CardFace};

    fn inventory() -> Inventory {
        let mut inventory = Inventory::new();
        inventory
            .register(Card::new(
                "forest",
                CardFace::new("Forest").with_types(&["Basic"], &["Land"], &["Forest"]),
            ))
            .unwrap();
        inventory
            .register(Card::new(
                "elf",
                CardFace::new("Llanowar Elves").with_types(&[], &["Creature"], &["Elf", "Druid"]),
            ))
            .unwrap();
        inventory
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn card(inventory: &Inventory, id: &str) -> Arc<Card> {
        Arc::clone(inventory.get(&CardId::new(id)).unwrap())
    }

    #[test]
    fn test_save_then_load() {
        let inventory = inventory();
        let mut document = DeckDocument::new();
        document.main.add(&card(&inventory, "elf"), 4, date());
        document.main.add(&card(&inventory, "forest"), 16, date());
        document.add_side("Sideboard").unwrap();
        document
            .list_mut(&ListRef::side("Sideboard"))
            .unwrap()
            .add(&card(&inventory, "elf"), 1, date());
        let lands =
            CategorySpec::new("Lands", Rgb::new(0, 128, 0), Filter::has_type("Land")).unwrap();
        document.main.add_category(lands, None).unwrap();
        document
            .main
            .add_category(
                CategorySpec::new("Dorks", Rgb::default(), Filter::has_type("Creature")).unwrap(),
                Some(0),
            )
            .unwrap();
        document
            .main
            .exclude_from("Dorks", &card(&inventory, "elf"))
            .unwrap();
        document.changelog = "2024-03-09: first draft\n".to_string();
        document.notes = "green".to_string();

        let mut bytes = Vec::new();
        save(&mut bytes, &document).unwrap();
        let loaded = load(bytes.as_slice(), &inventory, &LoadProgress::new()).unwrap();

        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.document, document);
    }

    #[test]
    fn test_unknown_card_is_skipped() {
        let json = r#"{
            "main": [
                { "id": "elf", "count": 2, "added": "2024-03-09" },
                { "id": "missing", "count": 1, "added": "2024-03-09" }
            ],
            "sides": [{ "name": "Side", "cards": [{ "id": "gone", "count": 1, "added": "2024-03-09" }] }]
        }"#;
        let progress = LoadProgress::new();
        let loaded = load(json.as_bytes(), &inventory(), &progress).unwrap();

        assert_eq!(loaded.document.main.total(), 2);
        assert_eq!(
            loaded.warnings,
            vec![
                LoadWarning { list: ListRef::Main, id: CardId::new("missing") },
                LoadWarning { list: ListRef::side("Side"), id: CardId::new("gone") },
            ]
        );
        assert_eq!(loaded.warnings[0].to_string(), "unknown card missing in main deck");
        assert_eq!(progress.processed(), 3);
        assert_eq!(progress.fraction(), 1.0);
    }

    #[test]
    fn test_categories_ordered_by_rank() {
        let json = r#"{
            "categories": [
                { "name": "B", "filter": "<all>", "rank": 1 },
                { "name": "A", "filter": "<none>", "rank": 0 }
            ]
        }"#;
        let loaded = load(json.as_bytes(), &inventory(), &LoadProgress::new()).unwrap();
        let names: Vec<_> = loaded.document.main.categories().map(|c| c.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_malformed_file_fails() {
        let progress = LoadProgress::new();
        assert!(matches!(
            load("{ \"main\": [".as_bytes(), &inventory(), &progress),
            Err(Error::Format { .. })
        ));

        let bad_filter = r#"{ "categories": [{ "name": "X", "filter": "<bogus>", "rank": 0 }] }"#;
        assert!(matches!(
            load(bad_filter.as_bytes(), &inventory(), &progress),
            Err(Error::Format { .. })
        ));

        let duplicate = r#"{ "categories": [
            { "name": "X", "filter": "<all>", "rank": 0 },
            { "name": "X", "filter": "<all>", "rank": 1 }
        ] }"#;
        assert!(matches!(
            load(duplicate.as_bytes(), &inventory(), &progress),
            Err(Error::DuplicateCategory { .. })
        ));
    }

    #[test]
    fn test_cancelled_load_fails() {
        let json = r#"{ "main": [{ "id": "elf", "count": 2, "added": "2024-03-09" }] }"#;
        let progress = LoadProgress::new();
        progress.cancel();
        assert!(matches!(
            load(json.as_bytes(), &inventory(), &progress),
            Err(Error::Cancelled)
        ));
        assert_eq!(progress.processed(), 0);
    }

    #[test]
    fn test_deeply_nested_filter_fails() {
        let depth = 200_000;
        let filter = format!("{}{}", "<and ".repeat(depth), ">".repeat(depth));
        let json = format!(r#"{{ "categories": [{{ "name": "X", "filter": "{filter}", "rank": 0 }}] }}"#);

        let result = load(json.as_bytes(), &inventory(), &LoadProgress::new());
        assert!(matches!(result, Err(Error::Format { .. })));
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("deck-file-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_save_file_replaces_existing() {
        let dir = scratch_dir("replace");
        let path = dir.join("deck.json");
        fs::write(&path, "old contents").unwrap();

        let mut document = DeckDocument::new();
        document.notes = "new".to_string();
        save_file(&path, &document).unwrap();

        let loaded = load_file(&path, &inventory(), &LoadProgress::new()).unwrap();
        assert_eq!(loaded.document.notes, "new");
        assert!(!sibling_temp_path(&path).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_save_keeps_target() {
        let dir = scratch_dir("failed");
        let target = dir.join("deck.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "kept").unwrap();

        assert!(matches!(
            save_file(&target, &DeckDocument::new()),
            Err(Error::Io(_))
        ));
        assert_eq!(fs::read_to_string(target.join("keep")).unwrap(), "kept");
        assert!(!sibling_temp_path(&target).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_count_overflow_fails_load() {
        let json = r#"{ "main": [
            { "id": "elf", "count": 4294967295, "added": "2024-03-09" },
            { "id": "forest", "count": 1, "added": "2024-03-09" }
        ] }"#;
        assert!(matches!(
            load(json.as_bytes(), &inventory(), &LoadProgress::new()),
            Err(Error::CountOverflow { .. })
        ));
    }
}
