//! Editing sessions.
//!
//! An [`Editor`] owns one document and its history. Every public edit
//! validates its arguments first and fails without touching anything;
//! otherwise it records one action whose steps capture everything needed
//! to apply and reverse it.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use log::{debug, warn};

use super::history::{ActionId, History, UndoableAction};
use crate::cards::{Card, CardId, Inventory};
use crate::category::CategorySpec;
use crate::config::EditorConfig;
use crate::deck::{Deck, DeckDocument, ListRef};
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::hand::{HandRng, SampleHand};
use crate::io::{self, ImportWarning, LoadProgress, LoadWarning};

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Receives notifications from an editor.
pub trait EditorObserver {
    /// The document changed through an edit, undo or redo.
    fn deck_changed(&mut self, document: &DeckDocument);

    /// The document was saved.
    fn saved(&mut self, _document: &DeckDocument, _path: Option<&Path>) {}
}

#[derive(Clone, Debug)]
struct Addition {
    card: Arc<Card>,
    count: u32,
    added: NaiveDate,
}

#[derive(Clone, Debug)]
struct Removal {
    card: Arc<Card>,
    count: u32,
    added: NaiveDate,
    /// Entry position before the edit.
    position: usize,
    /// Whether the whole entry goes away.
    whole: bool,
}

fn apply_additions(deck: &mut Deck, additions: &[Addition]) -> bool {
    additions
        .iter()
        .fold(true, |ok, a| deck.add(&a.card, a.count, a.added) && ok)
}

fn revert_additions(deck: &mut Deck, additions: &[Addition]) -> bool {
    additions
        .iter()
        .rev()
        .fold(true, |ok, a| deck.remove(a.card.id(), a.count) == a.count && ok)
}

/// Work out what removing `requests` from `deck` takes away. Repeated ids
/// are merged and counts are capped at what the deck holds.
fn plan_removals(deck: &Deck, requests: &[(CardId, u32)]) -> Vec<Removal> {
    let mut merged: Vec<(&CardId, u32)> = Vec::new();
    for (id, count) in requests {
        match merged.iter().position(|(seen, _)| *seen == id) {
            Some(i) => merged[i].1 = merged[i].1.saturating_add(*count),
            None => merged.push((id, *count)),
        }
    }

    merged
        .into_iter()
        .filter_map(|(id, count)| {
            let position = deck.position(id)?;
            let entry = &deck.entries()[position];
            let count = count.min(entry.count);
            (count > 0).then(|| Removal {
                card: Arc::clone(&entry.card),
                count,
                added: entry.added,
                position,
                whole: count == entry.count,
            })
        })
        .collect()
}

fn apply_removals(deck: &mut Deck, removals: &[Removal]) -> bool {
    removals
        .iter()
        .fold(true, |ok, r| deck.remove(r.card.id(), r.count) == r.count && ok)
}

fn revert_removals(deck: &mut Deck, removals: &[Removal]) -> bool {
    // Re-inserting whole entries by ascending original position puts every
    // one back where it was.
    let mut whole: Vec<&Removal> = removals.iter().filter(|r| r.whole).collect();
    whole.sort_by_key(|r| r.position);

    let mut ok = true;
    for r in whole {
        ok &= deck.insert_at(r.position, &r.card, r.count, r.added);
    }
    for r in removals.iter().filter(|r| !r.whole) {
        ok &= deck.add(&r.card, r.count, r.added);
    }
    ok
}

/// Sum `counts` and check the result still fits in `deck` alongside what it
/// already holds.
fn checked_total(deck: &Deck, list: &ListRef, counts: impl IntoIterator<Item = u32>) -> Result<u32> {
    let requested: u64 = counts.into_iter().map(u64::from).sum();
    u32::try_from(requested)
        .ok()
        .filter(|&total| deck.total().checked_add(total).is_some())
        .ok_or_else(|| Error::CountOverflow {
            list: list.to_string(),
            count: requested,
        })
}

fn copies(count: u32) -> String {
    if count == 1 {
        "1 card".to_string()
    } else {
        format!("{count} cards")
    }
}

/// An action whose steps edit one list of the document.
fn list_action(
    description: String,
    list: &ListRef,
    redo: impl Fn(&mut Deck) -> bool + 'static,
    undo: impl Fn(&mut Deck) -> bool + 'static,
) -> UndoableAction<DeckDocument> {
    let redo_list = list.clone();
    let undo_list = list.clone();
    UndoableAction::new(
        description,
        move |doc: &mut DeckDocument| doc.list_mut(&redo_list).is_ok_and(|deck| redo(deck)),
        move |doc: &mut DeckDocument| doc.list_mut(&undo_list).is_ok_and(|deck| undo(deck)),
    )
}

/// An action that swaps one category of the main deck for another version.
fn replace_category_action(
    description: String,
    old: CategorySpec,
    new: CategorySpec,
) -> UndoableAction<DeckDocument> {
    let old_name = old.name().to_string();
    let new_name = new.name().to_string();
    UndoableAction::new(
        description,
        move |doc: &mut DeckDocument| doc.main.replace_category(&old_name, new.clone()).is_ok(),
        move |doc: &mut DeckDocument| doc.main.replace_category(&new_name, old.clone()).is_ok(),
    )
}

/// One open deck with its undo history.
pub struct Editor {
    document: DeckDocument,
    history: History<DeckDocument>,
    config: EditorConfig,
    path: Option<PathBuf>,
    /// Top of the undo stack when the document was last saved.
    saved_at: Option<ActionId>,
    observers: Vec<Box<dyn EditorObserver>>,
}

impl Editor {
    /// Start with an empty document.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(DeckDocument::new(), config)
    }

    /// Edit an existing document, which counts as saved.
    #[must_use]
    pub fn with_document(document: DeckDocument, config: EditorConfig) -> Self {
        Self {
            document,
            history: History::new(),
            config,
            path: None,
            saved_at: None,
            observers: Vec::new(),
        }
    }

    /// Open a deck file.
    pub fn open(
        path: impl AsRef<Path>,
        inventory: &Inventory,
        progress: &LoadProgress,
        config: EditorConfig,
    ) -> Result<(Self, Vec<LoadWarning>)> {
        let path = path.as_ref();
        let loaded = io::load_file(path, inventory, progress)?;
        debug!("opened {}", path.display());
        let mut editor = Self::with_document(loaded.document, config);
        editor.path = Some(path.to_path_buf());
        Ok((editor, loaded.warnings))
    }

    #[must_use]
    pub fn document(&self) -> &DeckDocument {
        &self.document
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.document.main
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn history(&self) -> &History<DeckDocument> {
        &self.history
    }

    /// File the document was opened from or last saved to.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the document differs from the last save. Undoing back to the
    /// saved state clears this again.
    #[must_use]
    pub fn is_unsaved(&self) -> bool {
        self.history.top() != self.saved_at
    }

    pub fn add_observer(&mut self, observer: Box<dyn EditorObserver>) {
        self.observers.push(observer);
    }

    fn notify_changed(&mut self) {
        for observer in &mut self.observers {
            observer.deck_changed(&self.document);
        }
    }

    // === History ===

    /// Run and record an action. Returns whether it changed anything.
    ///
    /// An action that changes nothing is not recorded and leaves the redo
    /// stack intact.
    pub fn perform(&mut self, action: UndoableAction<DeckDocument>) -> bool {
        let changed = self.history.perform(&mut self.document, action);
        if changed {
            self.notify_changed();
        }
        changed
    }

    /// Run and record an action built from two steps.
    ///
    /// As with [`Editor::perform`], a no-op edit keeps the redo stack.
    pub fn perform_action(
        &mut self,
        description: impl Into<String>,
        redo: impl Fn(&mut DeckDocument) -> bool + 'static,
        undo: impl Fn(&mut DeckDocument) -> bool + 'static,
    ) -> bool {
        self.perform(UndoableAction::new(description, redo, undo))
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo(&mut self.document);
        if changed {
            self.notify_changed();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo(&mut self.document);
        if changed {
            self.notify_changed();
        }
        changed
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // === Cards ===

    fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// Add copies of cards to a list, dated today.
    pub fn add_cards(&mut self, list: &ListRef, cards: &[(Arc<Card>, u32)]) -> Result<bool> {
        self.add_cards_on(list, cards, Self::today())
    }

    /// Add copies of cards to a list with an explicit date for new entries.
    pub fn add_cards_on(
        &mut self,
        list: &ListRef,
        cards: &[(Arc<Card>, u32)],
        added: NaiveDate,
    ) -> Result<bool> {
        self.document.list(list)?;
        let additions: Vec<Addition> = cards
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(card, count)| Addition {
                card: Arc::clone(card),
                count: *count,
                added,
            })
            .collect();
        if additions.is_empty() {
            return Ok(false);
        }

        let total = checked_total(self.document.list(list)?, list, additions.iter().map(|a| a.count))?;
        let undo_additions = additions.clone();
        Ok(self.perform(list_action(
            format!("add {} to {}", copies(total), list),
            list,
            move |deck| apply_additions(deck, &additions),
            move |deck| revert_additions(deck, &undo_additions),
        )))
    }

    /// Remove up to the given number of copies of cards from a list.
    pub fn remove_cards(&mut self, list: &ListRef, cards: &[(CardId, u32)]) -> Result<bool> {
        let removals = plan_removals(self.document.list(list)?, cards);
        if removals.is_empty() {
            return Ok(false);
        }

        let total = removals.iter().map(|r| r.count).sum();
        let undo_removals = removals.clone();
        Ok(self.perform(list_action(
            format!("remove {} from {}", copies(total), list),
            list,
            move |deck| apply_removals(deck, &removals),
            move |deck| revert_removals(deck, &undo_removals),
        )))
    }

    /// Set the exact number of copies of a card in a list; zero removes it.
    pub fn set_count(&mut self, list: &ListRef, card: &Arc<Card>, count: u32) -> Result<bool> {
        let current = self.document.list(list)?.count(card.id());
        match count.cmp(&current) {
            std::cmp::Ordering::Equal => Ok(false),
            std::cmp::Ordering::Greater => {
                self.add_cards(list, &[(Arc::clone(card), count - current)])
            }
            std::cmp::Ordering::Less => {
                self.remove_cards(list, &[(card.id().clone(), current - count)])
            }
        }
    }

    /// Move copies of cards from one list to another as a single edit.
    /// Moved cards keep the date they were first added.
    pub fn move_cards(&mut self, from: &ListRef, to: &ListRef, cards: &[(CardId, u32)]) -> Result<bool> {
        let source = self.document.list(from)?;
        self.document.list(to)?;
        if from == to {
            return Ok(false);
        }

        let removals = plan_removals(source, cards);
        if removals.is_empty() {
            return Ok(false);
        }
        let additions: Vec<Addition> = removals
            .iter()
            .map(|r| Addition {
                card: Arc::clone(&r.card),
                count: r.count,
                added: r.added,
            })
            .collect();

        let total = checked_total(self.document.list(to)?, to, removals.iter().map(|r| r.count))?;
        let (redo_from, redo_to) = (from.clone(), to.clone());
        let (undo_from, undo_to) = (from.clone(), to.clone());
        let (redo_removals, redo_additions) = (removals.clone(), additions.clone());
        Ok(self.perform_action(
            format!("move {} from {} to {}", copies(total), from, to),
            move |doc| {
                doc.list_mut(&redo_from)
                    .is_ok_and(|deck| apply_removals(deck, &redo_removals))
                    && doc
                        .list_mut(&redo_to)
                        .is_ok_and(|deck| apply_additions(deck, &redo_additions))
            },
            move |doc| {
                doc.list_mut(&undo_to)
                    .is_ok_and(|deck| revert_additions(deck, &additions))
                    && doc
                        .list_mut(&undo_from)
                        .is_ok_and(|deck| revert_removals(deck, &removals))
            },
        ))
    }

    /// Import a `count name` text list into a list. Returns the lines that
    /// named no known card.
    pub fn import_text(
        &mut self,
        list: &ListRef,
        text: &str,
        inventory: &Inventory,
    ) -> Result<Vec<ImportWarning>> {
        self.document.list(list)?;
        let imported = io::import(text, inventory);
        self.add_cards(list, &imported.cards)?;
        Ok(imported.warnings)
    }

    // === Side lists ===

    /// Append an empty side list.
    pub fn add_side(&mut self, name: &str) -> Result<bool> {
        self.document.validate_side_name(name)?;
        let (redo_name, undo_name) = (name.to_string(), name.to_string());
        Ok(self.perform_action(
            format!("add list {name}"),
            move |doc| doc.add_side(redo_name.as_str()).is_ok(),
            move |doc| doc.remove_side(&undo_name).is_ok(),
        ))
    }

    /// Remove a side list and its cards.
    pub fn remove_side(&mut self, name: &str) -> Result<bool> {
        let deck = self.document.list(&ListRef::side(name))?.clone();
        let index = self
            .document
            .sides()
            .position(|(n, _)| n == name)
            .unwrap_or(self.document.side_count());

        let (redo_name, undo_name) = (name.to_string(), name.to_string());
        Ok(self.perform_action(
            format!("remove list {name}"),
            move |doc| doc.remove_side(&redo_name).is_ok(),
            move |doc| doc.insert_side(index, undo_name.as_str(), deck.clone()).is_ok(),
        ))
    }

    // === Categories ===

    /// Add a category at `rank` (or last).
    pub fn add_category(&mut self, spec: CategorySpec, rank: Option<usize>) -> Result<bool> {
        let deck = &self.document.main;
        if deck.has_category(spec.name()) {
            return Err(Error::DuplicateCategory {
                name: spec.name().to_string(),
            });
        }
        let count = deck.category_count();
        let rank = rank.unwrap_or(count);
        if rank > count {
            return Err(Error::RankOutOfRange {
                rank,
                count: count + 1,
            });
        }

        let name = spec.name().to_string();
        Ok(self.perform_action(
            format!("add category {name}"),
            move |doc| doc.main.add_category(spec.clone(), Some(rank)).is_ok(),
            move |doc| doc.main.remove_category(&name).is_ok(),
        ))
    }

    /// Add a category with the configured default color.
    pub fn create_category(&mut self, name: &str, filter: Filter) -> Result<bool> {
        let spec = CategorySpec::new(name, self.config.category_color, filter)?;
        self.add_category(spec, None)
    }

    /// Remove a category.
    pub fn remove_category(&mut self, name: &str) -> Result<bool> {
        let spec = self.document.main.category(name)?.clone();
        let rank = self.document.main.rank_of(name)?;

        let name = name.to_string();
        Ok(self.perform_action(
            format!("remove category {name}"),
            move |doc| doc.main.remove_category(&name).is_ok(),
            move |doc| doc.main.add_category(spec.clone(), Some(rank)).is_ok(),
        ))
    }

    /// Replace a category's name, color, filter and overrides, keeping its
    /// rank.
    pub fn edit_category(&mut self, name: &str, spec: CategorySpec) -> Result<bool> {
        let deck = &self.document.main;
        let old = deck.category(name)?.clone();
        if spec.name() != name && deck.has_category(spec.name()) {
            return Err(Error::DuplicateCategory {
                name: spec.name().to_string(),
            });
        }
        if old == spec {
            return Ok(false);
        }

        Ok(self.perform(replace_category_action(
            format!("edit category {name}"),
            old,
            spec,
        )))
    }

    /// Force cards into a category.
    pub fn include_cards(&mut self, name: &str, cards: &[Arc<Card>]) -> Result<bool> {
        let old = self.document.main.category(name)?.clone();
        let mut new = old.clone();
        let changed = cards.iter().fold(false, |changed, card| new.include(card) || changed);
        if !changed {
            return Ok(false);
        }
        Ok(self.perform(replace_category_action(
            format!("include {} in {name}", copies(cards.len() as u32)),
            old,
            new,
        )))
    }

    /// Force cards out of a category.
    pub fn exclude_cards(&mut self, name: &str, cards: &[Arc<Card>]) -> Result<bool> {
        let old = self.document.main.category(name)?.clone();
        let mut new = old.clone();
        let changed = cards.iter().fold(false, |changed, card| new.exclude(card) || changed);
        if !changed {
            return Ok(false);
        }
        Ok(self.perform(replace_category_action(
            format!("exclude {} from {name}", copies(cards.len() as u32)),
            old,
            new,
        )))
    }

    /// Move a category to another rank.
    pub fn swap_category_ranks(&mut self, name: &str, target: usize) -> Result<bool> {
        let deck = &self.document.main;
        let rank = deck.rank_of(name)?;
        if target >= deck.category_count() {
            return Err(Error::RankOutOfRange {
                rank: target,
                count: deck.category_count(),
            });
        }
        if rank == target {
            return Ok(false);
        }

        let (redo_name, undo_name) = (name.to_string(), name.to_string());
        Ok(self.perform_action(
            format!("move category {name} to rank {target}"),
            move |doc| doc.main.swap_category_ranks(&redo_name, target).is_ok(),
            move |doc| doc.main.swap_category_ranks(&undo_name, rank).is_ok(),
        ))
    }

    // === Notes ===

    /// Replace the free-text notes.
    pub fn set_notes(&mut self, notes: impl Into<String>) -> bool {
        let notes = notes.into();
        if notes == self.document.notes {
            return false;
        }
        let old = self.document.notes.clone();
        self.perform_action(
            "edit notes",
            move |doc| {
                doc.notes = notes.clone();
                true
            },
            move |doc| {
                doc.notes = old.clone();
                true
            },
        )
    }

    // === Sample hands ===

    /// A sample hand over the main deck with the configured hand size.
    #[must_use]
    pub fn sample_hand(&self, rng: HandRng) -> SampleHand {
        SampleHand::new(&self.document.main, self.config.hand_size, rng)
    }

    // === Saving ===

    fn append_changelog(&mut self, message: Option<&str>) {
        let Some(message) = message.map(str::trim).filter(|m| !m.is_empty()) else {
            return;
        };
        let changelog = &mut self.document.changelog;
        if !changelog.is_empty() && !changelog.ends_with('\n') {
            changelog.push('\n');
        }
        let mut format = self.config.changelog_date_format.as_str();
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            warn!("invalid changelog date format {:?}", format);
            format = DEFAULT_DATE_FORMAT;
        }
        let date = Self::today().format(format);
        changelog.push_str(&format!("{date}: {message}\n"));
    }

    /// Write the document, appending a dated changelog line when a message
    /// is given, and mark it saved.
    pub fn save_to<W: Write>(&mut self, writer: W, message: Option<&str>) -> Result<()> {
        let previous = self.document.changelog.len();
        self.append_changelog(message);
        if let Err(e) = io::save(writer, &self.document) {
            self.document.changelog.truncate(previous);
            return Err(e);
        }
        self.mark_saved();
        Ok(())
    }

    /// Save to a file and remember it as the document's path.
    pub fn save_as(&mut self, path: impl AsRef<Path>, message: Option<&str>) -> Result<()> {
        let path = path.as_ref();
        let previous = self.document.changelog.len();
        self.append_changelog(message);
        if let Err(e) = io::save_file(path, &self.document) {
            self.document.changelog.truncate(previous);
            return Err(e);
        }
        debug!("saved {}", path.display());
        self.path = Some(path.to_path_buf());
        self.mark_saved();
        Ok(())
    }

    /// Save to the document's path.
    pub fn save(&mut self, message: Option<&str>) -> Result<()> {
        let path = self.path.clone().ok_or(Error::NoFilePath)?;
        self.save_as(path, message)
    }

    /// Record the current state as saved.
    pub fn mark_saved(&mut self) {
        self.saved_at = self.history.top();
        for observer in &mut self.observers {
            observer.saved(&self.document, self.path.as_deref());
        }
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("path", &self.path)
            .field("history", &self.history)
            .field("unsaved", &self.is_unsaved())
            .finish_non_exhaustive()
    }
}
