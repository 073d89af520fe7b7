use crate::models::{Coordinates, Region, Station, Topic};
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading reference data
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate {kind} id: {id}")]
    Duplicate { kind: &'static str, id: String },

    #[error("Catalog has no stations")]
    Empty,
}

/// Shape of a catalog TOML file
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    stations: Vec<Station>,
    #[serde(default)]
    topics: Vec<Topic>,
}

/// Read-only station and topic reference data, loaded once at startup
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    stations: Vec<Station>,
    topics: Vec<Topic>,
}

impl ReferenceCatalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(stations: Vec<Station>, topics: Vec<Topic>) -> Result<Self, CatalogError> {
        if stations.is_empty() {
            return Err(CatalogError::Empty);
        }
        ensure_unique("station", stations.iter().map(|s| s.id.as_str()))?;
        ensure_unique("topic", topics.iter().map(|t| t.id.as_str()))?;

        Ok(Self { stations, topics })
    }

    /// Israel Railways stations and the standard study topics
    pub fn builtin() -> Self {
        Self {
            stations: builtin_stations(),
            topics: builtin_topics(),
        }
    }

    /// Parse a catalog from TOML. Topics fall back to the built-in list when
    /// the file defines none.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        let topics = if file.topics.is_empty() {
            builtin_topics()
        } else {
            file.topics
        };
        Self::new(file.stations, topics)
    }

    /// Load a catalog from a TOML file on disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_toml_str(&content)?;

        tracing::info!(
            "Loaded catalog from {} ({} stations, {} topics)",
            path.as_ref().display(),
            catalog.stations.len(),
            catalog.topics.len()
        );

        Ok(catalog)
    }

    /// Stations in catalog order
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn stations_in_region(&self, region: Region) -> Vec<&Station> {
        self.stations.iter().filter(|s| s.region == region).collect()
    }

    /// Topic ids in `ids` that the catalog does not know
    pub fn unknown_topics<'a, I>(&self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        ids.into_iter()
            .filter(|id| self.topic(id).is_none())
            .cloned()
            .collect()
    }

    pub fn topic_ids(&self) -> BTreeSet<String> {
        self.topics.iter().map(|t| t.id.clone()).collect()
    }
}

fn ensure_unique<'a>(kind: &'static str, ids: impl Iterator<Item = &'a str>) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::Duplicate {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn builtin_stations() -> Vec<Station> {
    use Region::*;

    const STATIONS: &[(&str, &str, Region, f64, f64)] = &[
        // North
        ("nahariya", "נהריה", North, 33.0047, 35.0987),
        ("acre", "עכו", North, 32.9283, 35.0833),
        ("kiryat-motzkin", "קרית מוצקין", North, 32.8333, 35.0781),
        ("kiryat-haim", "קרית חיים", North, 32.8253, 35.0550),
        ("hof-hacarmel", "חוף הכרמל", North, 32.7936, 34.9571),
        ("haifa-center", "חיפה מרכז", North, 32.8225, 35.0000),
        ("haifa-bat-galim", "חיפה בת גלים", North, 32.8308, 34.9817),
        ("haifa-hof-hacarmel", "חיפה חוף הכרמל", North, 32.7936, 34.9571),
        ("atlit", "עתלית", North, 32.6928, 34.9406),
        ("binyamina", "בנימינה", North, 32.5181, 34.9486),
        ("caesarea-pardes-hanna", "קיסריה פרדס חנה", North, 32.4856, 34.9447),
        ("hadera-west", "חדרה מערב", North, 32.4389, 34.8994),
        // Center
        ("netanya", "נתניה", Center, 32.3197, 34.8694),
        ("bet-yehoshua", "בית יהושע", Center, 32.2628, 34.8597),
        ("herzliya", "הרצליה", Center, 32.1636, 34.8172),
        ("tel-aviv-university", "תל אביב אוניברסיטה", Center, 32.1036, 34.8044),
        ("tel-aviv-savidor-center", "תל אביב סבידור מרכז", Center, 32.0836, 34.7983),
        ("tel-aviv-hashalom", "תל אביב השלום", Center, 32.0733, 34.7933),
        ("tel-aviv-hahagana", "תל אביב ההגנה", Center, 32.0542, 34.7847),
        ("bnei-brak", "בני ברק", Center, 32.1031, 34.8308),
        ("petah-tikva-segula", "פתח תקווה סגולה", Center, 32.1097, 34.9044),
        ("petah-tikva-kiryat-arye", "פתח תקווה קרית אריה", Center, 32.1067, 34.8631),
        ("rosh-haayin-north", "ראש העין צפון", Center, 32.1211, 34.9369),
        ("kfar-saba-nordau", "כפר סבא נורדאו", Center, 32.1683, 34.9178),
        ("hod-hasharon-sokolov", "הוד השרון סוקולוב", Center, 32.1694, 34.8997),
        // South
        ("bat-yam-yoseftal", "בת ים יוספטל", South, 32.0147, 34.7606),
        ("bat-yam-komemiyut", "בת ים קוממיות", South, 32.0031, 34.7606),
        ("holon-junction", "חולון צומת", South, 32.0372, 34.7772),
        ("holon-wolfson", "חולון וולפסון", South, 32.0356, 34.7597),
        ("rishon-lezion-moshe-dayan", "ראשון לציון משה דיין", South, 31.9883, 34.7578),
        ("rishon-lezion-harishonim", "ראשון לציון הראשונים", South, 31.9486, 34.8039),
        ("yavne-east", "יבנה מזרח", South, 31.8653, 34.7456),
        ("ashdod-ad-halom", "אשדוד עד הלום", South, 31.7747, 34.6656),
        ("ashkelon", "אשקלון", South, 31.6772, 34.6050),
        ("beer-sheva-north", "באר שבע צפון", South, 31.2614, 34.8094),
        ("beer-sheva-center", "באר שבע מרכז", South, 31.2431, 34.7983),
        ("dimona", "דימונה", South, 31.0703, 35.0117),
        // Jerusalem line
        ("lod", "לוד", Center, 31.9461, 34.8761),
        ("ramla", "רמלה", Center, 31.9283, 34.8767),
        ("bet-shemesh", "בית שמש", Jerusalem, 31.7578, 34.9889),
        ("jerusalem-malha", "ירושלים מלחה", Jerusalem, 31.7481, 35.1878),
        ("jerusalem-yitzhak-navon", "ירושלים יצחק נבון", Jerusalem, 31.7886, 35.2028),
    ];

    STATIONS
        .iter()
        .map(|&(id, name, region, lat, lng)| {
            Station::new(id, name, region, Some(Coordinates::new(lat, lng)))
        })
        .collect()
}

fn builtin_topics() -> Vec<Topic> {
    const TOPICS: &[(&str, &str, &str, &str)] = &[
        ("talmud", "תלמוד", "לימוד והעמקה בתלמוד הבבלי והירושלמי", "📚"),
        ("halacha", "הלכה", "לימוד הלכות יומיומיות ומעשיות", "📜"),
        ("mishna", "משנה", "לימוד משניות ופרקי אבות", "📖"),
        ("chumash", "חומש (פרשת שבוע)", "לימוד פרשת השבוע ומפרשים", "🕯️"),
        ("chassidut", "חסידות", "לימוד תורת החסידות והדרכותיה", "✨"),
        ("general", "כללי", "לימוד נושאים כלליים בתורה ויהדות", "🌟"),
    ];

    TOPICS
        .iter()
        .map(|&(id, name, description, icon)| Topic {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
        })
        .collect()
}
