//! Card definitions - immutable printed card data.
//!
//! A `Card` is built once (usually while loading the inventory) and then
//! shared as `Arc<Card>` by the inventory and every deck holding it. Derived
//! attributes (display name, normalized name, legend name, type line, mana
//! value, colors) are computed eagerly by the builder methods, so reads are
//! plain field accesses.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use super::attributes::{ColorSet, Layout, Rarity};
use super::mana::ManaCost;
use crate::error::{Error, Result};

/// Stable external identifier for a card (Scryfall id or multiverse id).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One face of a card. Most cards have exactly one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFace {
    pub name: String,
    pub mana_cost: ManaCost,
    pub supertypes: Vec<String>,
    pub types: Vec<String>,
    pub subtypes: Vec<String>,
    /// Rules text.
    pub text: String,
    pub flavor: String,
    /// Printed power; may be non-numeric (`*`, `1+*`).
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
}

impl CardFace {
    /// Create a face with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the mana cost (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, cost: ManaCost) -> Self {
        self.mana_cost = cost;
        self
    }

    /// Set the type line from its three parts (builder pattern).
    #[must_use]
    pub fn with_types(mut self, supertypes: &[&str], types: &[&str], subtypes: &[&str]) -> Self {
        let owned = |parts: &[&str]| -> Vec<String> { parts.iter().map(|s| s.to_string()).collect() };
        self.supertypes = owned(supertypes);
        self.types = owned(types);
        self.subtypes = owned(subtypes);
        self
    }

    /// Set rules text (builder pattern).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set flavor text (builder pattern).
    #[must_use]
    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = flavor.into();
        self
    }

    /// Set power and toughness (builder pattern).
    #[must_use]
    pub fn with_power_toughness(mut self, power: &str, toughness: &str) -> Self {
        self.power = Some(power.to_string());
        self.toughness = Some(toughness.to_string());
        self
    }

    /// Set starting loyalty (builder pattern).
    #[must_use]
    pub fn with_loyalty(mut self, loyalty: &str) -> Self {
        self.loyalty = Some(loyalty.to_string());
        self
    }

    /// Case-insensitive check across supertypes, types and subtypes.
    #[must_use]
    pub fn has_type(&self, name: &str) -> bool {
        self.supertypes
            .iter()
            .chain(&self.types)
            .chain(&self.subtypes)
            .any(|t| t.eq_ignore_ascii_case(name))
    }

    /// Printed type line, e.g. `Legendary Creature — Elf Druid`.
    #[must_use]
    pub fn type_line(&self) -> String {
        let mut line = self
            .supertypes
            .iter()
            .chain(&self.types)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        if !self.subtypes.is_empty() {
            line.push_str(" — ");
            line.push_str(&self.subtypes.join(" "));
        }
        line
    }
}

/// Parse the numeric part of a printed stat: `"3"` is 3, `"*"` is 0,
/// `"1+*"` is 1. Returns `None` when nothing numeric can be read.
#[must_use]
pub fn stat_value(stat: &str) -> Option<f64> {
    let stat = stat.trim();
    if stat.starts_with('*') {
        return Some(0.0);
    }
    let numeric: String = stat
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    numeric.parse().ok()
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use deck_editor::cards::{Card, CardFace, ManaCost};
///
/// let bolt = Card::new(
///     "bolt-1",
///     CardFace::new("Lightning Bolt")
///         .with_cost(ManaCost::parse("{R}").unwrap())
///         .with_types(&[], &["Instant"], &[]),
/// );
///
/// assert_eq!(bolt.mana_value(), 1.0);
/// assert!(!bolt.is_land());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "CardRecord", try_from = "CardRecord")]
pub struct Card {
    id: CardId,
    faces: SmallVec<[CardFace; 2]>,
    layout: Layout,
    rarity: Rarity,
    expansion: String,
    artist: String,
    color_indicator: Option<ColorSet>,
    identity_extra: ColorSet,

    // Derived
    name: String,
    normalized_name: String,
    legend_name: String,
    type_line: String,
    mana_value: f64,
    colors: ColorSet,
    color_identity: ColorSet,
}

/// The printed attributes of a card; derived ones are rebuilt on read.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CardRecord {
    id: CardId,
    faces: Vec<CardFace>,
    #[serde(default)]
    layout: Layout,
    #[serde(default)]
    rarity: Rarity,
    #[serde(default)]
    expansion: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    color_indicator: Option<ColorSet>,
    #[serde(default)]
    identity_extra: ColorSet,
}

impl From<Card> for CardRecord {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            faces: card.faces.into_vec(),
            layout: card.layout,
            rarity: card.rarity,
            expansion: card.expansion,
            artist: card.artist,
            color_indicator: card.color_indicator,
            identity_extra: card.identity_extra,
        }
    }
}

impl TryFrom<CardRecord> for Card {
    type Error = Error;

    fn try_from(record: CardRecord) -> Result<Self> {
        let mut faces = record.faces.into_iter();
        let front = faces.next().ok_or_else(|| Error::CardWithoutFaces { id: record.id.clone() })?;

        let mut card = Card::new(record.id, front).with_layout(record.layout);
        card.faces.extend(faces);
        card.rarity = record.rarity;
        card.expansion = record.expansion;
        card.artist = record.artist;
        card.color_indicator = record.color_indicator;
        card.identity_extra = record.identity_extra;
        card.derive();
        Ok(card)
    }
}

impl Card {
    /// Create a single-faced card.
    #[must_use]
    pub fn new(id: impl Into<CardId>, front: CardFace) -> Self {
        let mut card = Self {
            id: id.into(),
            faces: smallvec![front],
            layout: Layout::Normal,
            rarity: Rarity::default(),
            expansion: String::new(),
            artist: String::new(),
            color_indicator: None,
            identity_extra: ColorSet::COLORLESS,
            name: String::new(),
            normalized_name: String::new(),
            legend_name: String::new(),
            type_line: String::new(),
            mana_value: 0.0,
            colors: ColorSet::COLORLESS,
            color_identity: ColorSet::COLORLESS,
        };
        card.derive();
        card
    }

    /// Add another face (builder pattern).
    #[must_use]
    pub fn with_face(mut self, face: CardFace) -> Self {
        self.faces.push(face);
        self.derive();
        self
    }

    /// Set the layout (builder pattern).
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self.derive();
        self
    }

    /// Set rarity (builder pattern).
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Set the expansion code (builder pattern).
    #[must_use]
    pub fn with_expansion(mut self, expansion: impl Into<String>) -> Self {
        self.expansion = expansion.into();
        self
    }

    /// Set the artist (builder pattern).
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    /// Override the colors derived from mana costs (color indicator,
    /// devoid, and so on).
    #[must_use]
    pub fn with_colors(mut self, colors: ColorSet) -> Self {
        self.color_indicator = Some(colors);
        self.derive();
        self
    }

    /// Add colors to the identity that come from rules text symbols.
    #[must_use]
    pub fn with_identity(mut self, extra: ColorSet) -> Self {
        self.identity_extra = extra;
        self.derive();
        self
    }

    fn derive(&mut self) {
        self.name = self
            .faces
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(" // ");
        self.normalized_name = normalize_name(&self.name);
        self.legend_name = legend_name(&self.faces[0]);
        self.type_line = self
            .faces
            .iter()
            .map(CardFace::type_line)
            .collect::<Vec<_>>()
            .join(" // ");
        self.mana_value = if self.layout.combines_mana_value() {
            self.faces.iter().map(|f| f.mana_cost.mana_value()).sum()
        } else {
            self.faces[0].mana_cost.mana_value()
        };
        let cost_colors = self
            .faces
            .iter()
            .fold(ColorSet::COLORLESS, |set, f| set.union(f.mana_cost.colors()));
        self.colors = self.color_indicator.unwrap_or(cost_colors);
        self.color_identity = self
            .colors
            .union(cost_colors)
            .union(self.identity_extra);
    }

    #[must_use]
    pub fn id(&self) -> &CardId {
        &self.id
    }

    /// Display name; faces joined with `" // "`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-case ASCII-folded name for lookups.
    #[must_use]
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    /// The part of a legendary name before its epithet.
    #[must_use]
    pub fn legend_name(&self) -> &str {
        &self.legend_name
    }

    #[must_use]
    pub fn type_line(&self) -> &str {
        &self.type_line
    }

    #[must_use]
    pub fn faces(&self) -> &[CardFace] {
        &self.faces
    }

    #[must_use]
    pub fn front(&self) -> &CardFace {
        &self.faces[0]
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[must_use]
    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    #[must_use]
    pub fn expansion(&self) -> &str {
        &self.expansion
    }

    #[must_use]
    pub fn artist(&self) -> &str {
        &self.artist
    }

    #[must_use]
    pub fn mana_value(&self) -> f64 {
        self.mana_value
    }

    #[must_use]
    pub fn colors(&self) -> ColorSet {
        self.colors
    }

    #[must_use]
    pub fn color_identity(&self) -> ColorSet {
        self.color_identity
    }

    /// A card is a land when its front face is.
    #[must_use]
    pub fn is_land(&self) -> bool {
        self.faces[0].types.iter().any(|t| t.eq_ignore_ascii_case("land"))
    }

    /// Whether any face has the given supertype, type or subtype.
    #[must_use]
    pub fn has_type(&self, name: &str) -> bool {
        self.faces.iter().any(|f| f.has_type(name))
    }
}

/// Lower-case a name and fold the accented letters that appear in card names.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            'Æ' | 'æ' => out.push_str("ae"),
            'á' | 'à' | 'â' | 'ä' | 'Á' | 'À' | 'Â' | 'Ä' => out.push('a'),
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => out.push('e'),
            'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => out.push('i'),
            'ó' | 'ò' | 'ô' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Ö' => out.push('o'),
            'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => out.push('u'),
            'ñ' | 'Ñ' => out.push('n'),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

fn legend_name(front: &CardFace) -> String {
    let legendary = front
        .supertypes
        .iter()
        .any(|t| t.eq_ignore_ascii_case("legendary"));
    match front.name.split_once(',') {
        Some((head, _)) if legendary => head.trim().to_string(),
        _ => front.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::attributes::Color;

    fn face(name: &str, cost: &str) -> CardFace {
        CardFace::new(name).with_cost(ManaCost::parse(cost).unwrap())
    }

    #[test]
    fn test_card_id() {
        let id = CardId::new("abc-123");
        assert_eq!(id.as_str(), "abc-123");
        assert_eq!(format!("{}", id), "abc-123");
    }

    #[test]
    fn test_single_face_derivation() {
        let card = Card::new(
            "1",
            face("Llanowar Elves", "{G}")
                .with_types(&[], &["Creature"], &["Elf", "Druid"])
                .with_power_toughness("1", "1"),
        );

        assert_eq!(card.name(), "Llanowar Elves");
        assert_eq!(card.normalized_name(), "llanowar elves");
        assert_eq!(card.type_line(), "Creature — Elf Druid");
        assert_eq!(card.mana_value(), 1.0);
        assert_eq!(card.colors(), ColorSet::of([Color::Green]));
        assert!(card.has_type("elf"));
        assert!(!card.is_land());
    }

    #[test]
    fn test_split_card_combines_mana_value() {
        let card = Card::new("2", face("Fire", "{1}{R}").with_types(&[], &["Instant"], &[]))
            .with_face(face("Ice", "{1}{U}").with_types(&[], &["Instant"], &[]))
            .with_layout(Layout::Split);

        assert_eq!(card.name(), "Fire // Ice");
        assert_eq!(card.mana_value(), 4.0);
        assert_eq!(card.colors().letters(), "UR");
        assert_eq!(card.type_line(), "Instant // Instant");
    }

    #[test]
    fn test_modal_land_back_face() {
        let card = Card::new(
            "3",
            face("Agadeem's Awakening", "{X}{B}{B}{B}").with_types(&[], &["Sorcery"], &[]),
        )
        .with_face(CardFace::new("Agadeem, the Undercrypt").with_types(&[], &["Land"], &[]))
        .with_layout(Layout::ModalDfc);

        assert_eq!(card.mana_value(), 3.0);
        assert!(!card.is_land());
        assert!(card.has_type("Land"));
    }

    #[test]
    fn test_color_indicator_and_identity() {
        let card = Card::new("4", face("Ancestral Vision", "").with_types(&[], &["Sorcery"], &[]))
            .with_colors(ColorSet::of([Color::Blue]));
        assert_eq!(card.colors(), ColorSet::of([Color::Blue]));

        let commander = Card::new("5", face("Elf Lord", "{G}"))
            .with_identity(ColorSet::of([Color::White]));
        assert_eq!(commander.colors().letters(), "G");
        assert_eq!(commander.color_identity().letters(), "WG");
    }

    #[test]
    fn test_legend_and_normalized_names() {
        let card = Card::new(
            "6",
            CardFace::new("Jötun Grunt, the Æther Sage").with_types(&["Legendary"], &["Creature"], &[]),
        );
        assert_eq!(card.legend_name(), "Jötun Grunt");
        assert_eq!(card.normalized_name(), "jotun grunt, the aether sage");
    }

    #[test]
    fn test_stat_value() {
        assert_eq!(stat_value("3"), Some(3.0));
        assert_eq!(stat_value("*"), Some(0.0));
        assert_eq!(stat_value("1+*"), Some(1.0));
        assert_eq!(stat_value("X"), None);
    }

    #[test]
    fn test_serde_rebuilds_derived_fields() {
        let card = Card::new("fire-ice", face("Fire", "{1}{R}"))
            .with_face(face("Ice", "{1}{U}"))
            .with_layout(Layout::Split)
            .with_rarity(Rarity::Uncommon);
        let json = serde_json::to_string(&card).unwrap();
        assert!(!json.contains("normalized_name"));

        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
        assert_eq!(back.name(), "Fire // Ice");

        let stale = r#"{ "id": "x", "faces": [{ "name": "Forest" }], "name": "Wrong", "mana_value": 9 }"#;
        let rebuilt: Card = serde_json::from_str(stale).unwrap();
        assert_eq!(rebuilt.name(), "Forest");
        assert_eq!(rebuilt.mana_value(), 0.0);
    }

    #[test]
    fn test_serde_rejects_card_without_faces() {
        let result = serde_json::from_str::<Card>(r#"{ "id": "x", "faces": [] }"#);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("card x has no faces"), "{message}");
    }
}
