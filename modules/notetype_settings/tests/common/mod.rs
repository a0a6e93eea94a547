//! Common test utilities: template fixtures, mock repository and service setup

#![allow(dead_code)]

use chrono::Utc;
use notetype_settings::contract::{CardTemplate, Notetype, NotetypeField};
use notetype_settings::domain::{DefinitionTable, Service, ServiceOptions, TemplateCatalog};
use notetype_settings::infra::catalog::StaticCatalog;
use std::sync::Arc;

pub const CLOZE: &str = "Cloze";
pub const BASIC: &str = "Basic";
pub const OCCLUSION: &str = "Occlusion";

pub const CSS: &str = ".card {
  --font-size: 22px;
  --text: #363638;
}
.timer {
  display: block;
}
";

/// Front template with a version header and the autoflip/countdown variables
pub fn front(version: &str, autoflip: bool) -> String {
    format!(
        "<!-- version {} -->\n<div class=\"front\">{{{{cloze:Text}}}}</div>\n<script>\nvar autoflip = {}\nvar seconds = 9;\nvar minutes = 0;\n</script>\n",
        version, autoflip
    )
}

/// Back template with three configurable fields, two of them hint buttons
pub fn back(hammer_enabled: bool) -> String {
    let hammer = r#"{{#Hammer}}<a class="hints" data-field="Hammer">{{Hammer}}</a>{{/Hammer}}"#;
    let hammer = if hammer_enabled {
        hammer.to_string()
    } else {
        format!("<!--{}-->", hammer)
    };

    format!(
        r#"<div class="back">
{{{{#Extra}}}}<div id="extra">{{{{Extra}}}}</div>{{{{/Extra}}}}
{}
{{{{#Lecture Notes}}}}<a class="hints" data-field="Lecture Notes">{{{{Lecture Notes}}}}</a>{{{{/Lecture Notes}}}}
</div>
<script>
var ButtonShortcuts = {{
  "Hammer": "Ctrl+Shift+1",
  "Lecture Notes": "Ctrl+Shift+2",
}}
var ButtonAutoReveal = {{
  "Hammer": false,
  "Lecture Notes": false,
}}
var ScrollToButton = true
var ScrollToHint = true
</script>
"#,
        hammer
    )
}

pub fn fields() -> Vec<NotetypeField> {
    ["Text", "Extra", "Hammer", "Lecture Notes"]
        .iter()
        .enumerate()
        .map(|(ord, name)| NotetypeField::new(*name, ord as u32))
        .collect()
}

/// A notetype of the fixture families
pub fn notetype(id: i64, name: &str, version: &str, autoflip: bool) -> Notetype {
    Notetype {
        id,
        name: name.to_string(),
        templates: vec![CardTemplate {
            name: "Card 1".to_string(),
            front: front(version, autoflip),
            back: back(true),
        }],
        css: CSS.to_string(),
        fields: fields(),
        modified: Utc::now(),
        usn: 0,
    }
}

/// Catalog with the three fixture families at `version`
pub fn catalog(version: &str) -> StaticCatalog {
    StaticCatalog::new(
        [CLOZE, BASIC, OCCLUSION]
            .iter()
            .map(|name| notetype(0, name, version, true)),
    )
}

/// Front template carrying every front-side setting
pub fn full_front() -> String {
    format!(
        r#"{}<!--tts en_US speed=1.4:Text-->
<script>
var selectiveOneByOne = false;
var minNumberOfClozes = 2;
var alwaysOneByOne = true;
var indentation = true;
var bionicReading = false;
var formattingDIVI = false;
var twoColumnLayout = false;
var columnRatio = "1fr 1.5fr";
var tagID = "XXXYYYZZZ";
var numTagLevelsToShow = 0;
</script>
"#,
        front("1", true)
    )
}

/// Back template carrying every back-side setting
pub fn full_back() -> String {
    let mut user_actions = String::new();
    for slot in 1..=8 {
        user_actions.push_str(&format!("var userJs{} = undefined\n", slot));
    }

    format!(
        r#"{}<!--tts en_US speed=1.4:Text-->
<script>
var ToggleNextButtonShortcut = "H"
var ToggleAllButtonsShortcut = "'"
var RevealIncrementalShortcut = "N"
var ToggleAllOcclusionsShortcut = ","
var revealNextShortcut = "N"
var revealNextWordShortcut = "Shift+N"
var toggleAllShortcut = ","
var revealNextClozeMode = "cloze"
var clozeHider = (elt) => "[___]"
var selectiveOneByOne = false;
var minNumberOfClozes = 2;
var alwaysOneByOne = false;
var indentation = true;
var bionicReading = false;
var formattingDIVI = false;
var twoColumnLayout = false;
var columnRatio = "1fr 1.5fr";
var tagID = "XXXYYYZZZ";
var tagUniversity = "XXXYYYZZZ";
var toggleTagsShortcut = "C"
var numTagLevelsToShow = 0;
{}</script>
"#,
        back(true),
        user_actions
    )
}

/// Stylesheet carrying every style setting
pub const FULL_CSS: &str = "\
.card {
  --font-size: 22px;
  --extra-font-size: 18px;
  --table-font-size: 1em;
  --max-card-width: 900px;
  --default-alignment: left;
  --button-alignment: center;
  --text: #363638;
  --bg: #f8f8f8;
  --text-cloze: IndianRed;
  --text-bold: inherit;
  --text-underline: inherit;
  --text-italics: inherit;
  --rect-bg: moccasin;
  --rect-border: olive;
  --active-rect-bg: salmon;
  --active-rect-border: yellow;
}
.night_mode {
  --nm-text: #e9e9e9 !important;
  --nm-bg: #363638 !important;
  --text-cloze: IndianRed !important;
}
.card,
kbd {
  font-family: Arial Greek, Arial;
}
.timer {
  display: block;
  color: transparent;
}
#extra {
  color: navy;
}
.night_mode #extra {
  color: magenta !important;
}
.hints {
  color: #4297F9;
}
.night_mode .hints {
  color: cyan !important;
}
#missed {
  color: red;
}
img {
  max-height: 100%;
  max-width: 85%;
}
#tags-container {
  display: block;
}
.mobile #tags-container {
  display: none;
}
/*############ DO NOT DELETE #############*/
/*~~~~~~~~~CUSTOM COLOR INSERTION~~~~~~~~~*/

/*############ DO NOT DELETE #############*/

/*############ DO NOT DELETE #############*/
/*~~~~~~~~~CUSTOM STYLE INSERTION~~~~~~~~~*/

/*############ DO NOT DELETE #############*/
";

/// A notetype on which every built-in setting is present
pub fn full_notetype(id: i64, name: &str) -> Notetype {
    Notetype {
        id,
        name: name.to_string(),
        templates: vec![CardTemplate {
            name: "Card 1".to_string(),
            front: full_front(),
            back: full_back(),
        }],
        css: FULL_CSS.to_string(),
        fields: fields(),
        modified: Utc::now(),
        usn: 0,
    }
}

/// Service over a mock collection
pub struct Fixture {
    pub service: Arc<Service>,
    pub repo: Arc<mocks::MockNotetypeRepo>,
    pub events: Arc<mocks::RecordingEventPublisher>,
}

impl Fixture {
    pub fn new(collection: Vec<Notetype>, catalog_version: &str) -> Self {
        Self::with_options(collection, catalog_version, ServiceOptions::default())
    }

    pub fn with_options(
        collection: Vec<Notetype>,
        catalog_version: &str,
        options: ServiceOptions,
    ) -> Self {
        let catalog = Arc::new(catalog(catalog_version));
        let families = catalog.families();
        let definitions = DefinitionTable::with_families(families.iter()).unwrap();

        let repo = Arc::new(mocks::MockNotetypeRepo::with(collection));
        let events = Arc::new(mocks::RecordingEventPublisher::default());
        let service = Service::new(repo.clone(), catalog, definitions, events.clone())
            .with_options(options);

        Self {
            service: Arc::new(service),
            repo,
            events,
        }
    }

    /// Stored notetype by name
    pub fn stored(&self, name: &str) -> Notetype {
        self.repo
            .by_name(name)
            .unwrap_or_else(|| panic!("{} is not in the collection", name))
    }
}

// Mock repository implementations for testing
pub mod mocks {
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use notetype_settings::contract::Notetype;
    use notetype_settings::domain::repository::NotetypeRepository;
    use notetype_settings::domain::{EventPublisher, NotetypeEvent};
    use parking_lot::RwLock;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    pub struct MockNotetypeRepo {
        notetypes: Arc<RwLock<HashMap<i64, Notetype>>>,
        /// note id -> notetype id
        notes: Arc<RwLock<HashMap<i64, i64>>>,
        next_id: AtomicI64,
    }

    impl MockNotetypeRepo {
        pub fn with(collection: Vec<Notetype>) -> Self {
            let repo = Self {
                next_id: AtomicI64::new(1000),
                ..Self::default()
            };
            for notetype in collection {
                repo.notetypes.write().insert(notetype.id, notetype);
            }
            repo
        }

        pub fn add_note(&self, note_id: i64, notetype_id: i64) {
            self.notes.write().insert(note_id, notetype_id);
        }

        pub fn by_name(&self, name: &str) -> Option<Notetype> {
            self.notetypes
                .read()
                .values()
                .find(|notetype| notetype.name == name)
                .cloned()
        }

        pub fn names(&self) -> Vec<String> {
            let mut names: Vec<String> = self
                .notetypes
                .read()
                .values()
                .map(|notetype| notetype.name.clone())
                .collect();
            names.sort();
            names
        }

        pub fn notetype_of_note(&self, note_id: i64) -> Option<i64> {
            self.notes.read().get(&note_id).copied()
        }
    }

    #[async_trait]
    impl NotetypeRepository for MockNotetypeRepo {
        async fn find_by_id(&self, id: i64) -> Result<Option<Notetype>> {
            Ok(self.notetypes.read().get(&id).cloned())
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Notetype>> {
            Ok(self.by_name(name))
        }

        async fn list_names_and_ids(&self) -> Result<Vec<(String, i64)>> {
            let mut result: Vec<(String, i64)> = self
                .notetypes
                .read()
                .values()
                .map(|notetype| (notetype.name.clone(), notetype.id))
                .collect();
            result.sort();
            Ok(result)
        }

        async fn add(&self, notetype: &Notetype) -> Result<Notetype> {
            let mut added = notetype.clone();
            if added.id == 0 {
                added.id = self.next_id.fetch_add(1, Ordering::SeqCst);
            }
            self.notetypes.write().insert(added.id, added.clone());
            Ok(added)
        }

        async fn update(&self, notetype: &Notetype) -> Result<Notetype> {
            let mut notetypes = self.notetypes.write();
            if !notetypes.contains_key(&notetype.id) {
                return Err(anyhow!("notetype {} does not exist", notetype.id));
            }
            notetypes.insert(notetype.id, notetype.clone());
            Ok(notetype.clone())
        }

        async fn remove(&self, id: i64) -> Result<()> {
            self.notetypes.write().remove(&id);
            Ok(())
        }

        async fn note_ids(&self, notetype_id: i64) -> Result<Vec<i64>> {
            let mut ids: Vec<i64> = self
                .notes
                .read()
                .iter()
                .filter(|(_, owner)| **owner == notetype_id)
                .map(|(id, _)| *id)
                .collect();
            ids.sort();
            Ok(ids)
        }

        async fn change_notetype(&self, note_ids: &[i64], to_notetype_id: i64) -> Result<()> {
            let mut notes = self.notes.write();
            for id in note_ids {
                notes.insert(*id, to_notetype_id);
            }
            Ok(())
        }
    }

    /// Publisher that keeps every event
    #[derive(Default)]
    pub struct RecordingEventPublisher {
        events: RwLock<Vec<NotetypeEvent>>,
    }

    impl RecordingEventPublisher {
        pub fn events(&self) -> Vec<NotetypeEvent> {
            self.events.read().clone()
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingEventPublisher {
        async fn publish(&self, event: NotetypeEvent) -> Result<()> {
            self.events.write().push(event);
            Ok(())
        }
    }
}
