use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One Android API level known to the build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub api_level: u32,
    pub platform_id: String,

    /// Framework version label (e.g. `v13.0`) when this level ships a
    /// framework assembly.
    #[serde(default)]
    pub framework: Option<String>,

    #[serde(default)]
    pub stable: bool,

    #[serde(default)]
    pub supported: bool,
}

impl PlatformEntry {
    pub fn new(api_level: u32, platform_id: &str, framework: Option<&str>, stable: bool, supported: bool) -> Self {
        Self {
            api_level,
            platform_id: platform_id.to_string(),
            framework: framework.map(str::to_string),
            stable,
            supported,
        }
    }

    fn framework_label(&self) -> Option<&str> {
        self.framework.as_deref().filter(|f| !f.is_empty())
    }
}

/// Immutable, ascending-by-API-level list of platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<PlatformEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<PlatformEntry>) -> Result<Self, ConfigError> {
        for pair in entries.windows(2) {
            if pair[1].api_level <= pair[0].api_level {
                return Err(ConfigError::CatalogOrder {
                    previous: pair[0].api_level,
                    next: pair[1].api_level,
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PlatformEntry] {
        &self.entries
    }

    pub fn supported(&self) -> impl Iterator<Item = &PlatformEntry> {
        self.entries.iter().filter(|e| e.supported)
    }

    /// Framework labels of every entry that has one, in catalog order.
    pub fn frameworks(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(PlatformEntry::framework_label)
    }

    pub fn stable_frameworks(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.stable)
            .filter_map(PlatformEntry::framework_label)
    }

    /// Last framework of the stable subsequence.
    pub fn latest_stable_framework(&self) -> Result<&str, ConfigError> {
        self.stable_frameworks()
            .last()
            .ok_or(ConfigError::NoStablePlatforms)
    }

    /// `ALL_*` / `API_LEVELS` style value lists derived from the catalog.
    pub fn value_lists(&self) -> CatalogLists {
        let mut lists = CatalogLists::default();

        for e in &self.entries {
            let api = e.api_level.to_string();
            lists.all_api_levels.push(api.clone());
            lists.all_platform_ids.push(e.platform_id.clone());

            match e.framework_label() {
                Some(fw) => {
                    lists.all_frameworks.push(fw.to_string());
                    lists.frameworks.push(fw.to_string());
                    if e.stable {
                        lists.stable_frameworks.push(fw.to_string());
                    }
                }
                None => lists.all_frameworks.push("-".to_string()),
            }

            if !e.supported {
                continue;
            }

            lists.api_levels.push(api.clone());
            if e.stable {
                lists.stable_api_levels.push(api);
            }
        }

        lists
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogLists {
    pub all_api_levels: Vec<String>,
    pub all_platform_ids: Vec<String>,
    pub all_frameworks: Vec<String>,
    pub api_levels: Vec<String>,
    pub stable_api_levels: Vec<String>,
    pub frameworks: Vec<String>,
    pub stable_frameworks: Vec<String>,
}

/// Catalog used when the configuration declares no `[[platforms]]`.
pub fn default_catalog() -> Catalog {
    let p = PlatformEntry::new;
    let entries = vec![
        p(1, "1", None, true, false),
        p(2, "2", None, true, false),
        p(3, "3", None, true, false),
        p(4, "4", Some("v1.6"), true, false),
        p(5, "5", Some("v2.0"), true, false),
        p(6, "6", Some("v2.0.1"), true, false),
        p(7, "7", Some("v2.1"), true, false),
        p(8, "8", Some("v2.2"), true, false),
        p(9, "9", Some("v2.3"), true, false),
        p(10, "10", Some("v2.3"), true, false),
        p(11, "11", Some("v3.0"), true, false),
        p(12, "12", Some("v3.1"), true, false),
        p(13, "13", Some("v3.2"), true, false),
        p(14, "14", Some("v4.0"), true, false),
        p(15, "15", Some("v4.0.3"), true, false),
        p(16, "16", Some("v4.1"), true, false),
        p(17, "17", Some("v4.2"), true, false),
        p(18, "18", Some("v4.3"), true, false),
        p(19, "19", Some("v4.4"), true, false),
        p(20, "20", Some("v4.4.87"), true, false),
        p(21, "21", Some("v5.0"), true, true),
        p(22, "22", Some("v5.1"), true, true),
        p(23, "23", Some("v6.0"), true, true),
        p(24, "24", Some("v7.0"), true, true),
        p(25, "25", Some("v7.1"), true, true),
        p(26, "26", Some("v8.0"), true, true),
        p(27, "27", Some("v8.1"), true, true),
        p(28, "28", Some("v9.0"), true, true),
        p(29, "29", Some("v10.0"), true, true),
        p(30, "30", Some("v11.0"), true, true),
        p(31, "31", Some("v12.0"), true, true),
        p(32, "32", Some("v12.1"), true, true),
        p(33, "33", Some("v13.0"), true, true),
        p(34, "UpsideDownCake", Some("v13.0.99"), false, true),
    ];

    // Static table, ascending by construction.
    Catalog { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_order_levels() {
        let err = Catalog::new(vec![
            PlatformEntry::new(22, "22", Some("v5.1"), true, true),
            PlatformEntry::new(21, "21", Some("v5.0"), true, true),
        ])
        .unwrap_err();

        assert!(matches!(err, ConfigError::CatalogOrder { previous: 22, next: 21 }));
    }

    #[test]
    fn latest_stable_ignores_unstable_tail() {
        let cat = default_catalog();
        assert_eq!(cat.latest_stable_framework().unwrap(), "v13.0");
    }

    #[test]
    fn latest_stable_fails_on_empty_stable_set() {
        let cat = Catalog::new(vec![PlatformEntry::new(34, "34", Some("v14.0"), false, true)]).unwrap();
        assert!(matches!(cat.latest_stable_framework(), Err(ConfigError::NoStablePlatforms)));
    }

    #[test]
    fn value_lists_mark_missing_frameworks() {
        let cat = Catalog::new(vec![
            PlatformEntry::new(3, "3", None, true, false),
            PlatformEntry::new(21, "21", Some("v5.0"), true, true),
            PlatformEntry::new(34, "Next", Some("v14.0"), false, true),
        ])
        .unwrap();

        let lists = cat.value_lists();
        assert_eq!(lists.all_frameworks, vec!["-", "v5.0", "v14.0"]);
        assert_eq!(lists.api_levels, vec!["21", "34"]);
        assert_eq!(lists.stable_api_levels, vec!["21"]);
        assert_eq!(lists.stable_frameworks, vec!["v5.0"]);
        assert_eq!(lists.all_platform_ids, vec!["3", "21", "Next"]);
    }
}
