use crate::api::models::DataDragonChampions;
use std::collections::HashMap;

// Champion roster snapshot bundled so the crate works without network access.
// Data Dragon can extend it at runtime for champions released after this list.
const BUILTIN_CHAMPIONS: &[(i32, &str)] = &[
    (1, "Annie"),
    (2, "Olaf"),
    (3, "Galio"),
    (4, "TwistedFate"),
    (5, "XinZhao"),
    (6, "Urgot"),
    (7, "LeBlanc"),
    (8, "Vladimir"),
    (9, "Fiddlesticks"),
    (10, "Kayle"),
    (11, "MasterYi"),
    (12, "Alistar"),
    (13, "Ryze"),
    (14, "Sion"),
    (15, "Sivir"),
    (16, "Soraka"),
    (17, "Teemo"),
    (18, "Tristana"),
    (19, "Warwick"),
    (20, "Nunu"),
    (21, "MissFortune"),
    (22, "Ashe"),
    (23, "Tryndamere"),
    (24, "Jax"),
    (25, "Morgana"),
    (26, "Zilean"),
    (27, "Singed"),
    (28, "Evelynn"),
    (29, "Twitch"),
    (30, "Karthus"),
    (31, "ChoGath"),
    (32, "Amumu"),
    (33, "Rammus"),
    (34, "Anivia"),
    (35, "Shaco"),
    (36, "DrMundo"),
    (37, "Sona"),
    (38, "Kassadin"),
    (39, "Irelia"),
    (40, "Janna"),
    (41, "Gangplank"),
    (42, "Corki"),
    (43, "Karma"),
    (44, "Taric"),
    (45, "Veigar"),
    (48, "Trundle"),
    (50, "Swain"),
    (51, "Caitlyn"),
    (53, "Blitzcrank"),
    (54, "Malphite"),
    (55, "Katarina"),
    (56, "Nocturne"),
    (57, "Maokai"),
    (58, "Renekton"),
    (59, "JarvanIV"),
    (60, "Elise"),
    (61, "Orianna"),
    (62, "MonkeyKing"),
    (63, "Brand"),
    (64, "LeeSin"),
    (67, "Vayne"),
    (68, "Rumble"),
    (69, "Cassiopeia"),
    (72, "Skarner"),
    (74, "Heimerdinger"),
    (75, "Nasus"),
    (76, "Nidalee"),
    (77, "Udyr"),
    (78, "Poppy"),
    (79, "Gragas"),
    (80, "Pantheon"),
    (81, "Ezreal"),
    (82, "Mordekaiser"),
    (83, "Yorick"),
    (84, "Akali"),
    (85, "Kennen"),
    (86, "Garen"),
    (89, "Leona"),
    (90, "Malzahar"),
    (91, "Talon"),
    (92, "Riven"),
    (96, "KogMaw"),
    (98, "Shen"),
    (99, "Lux"),
    (101, "Xerath"),
    (102, "Shyvana"),
    (103, "Ahri"),
    (104, "Graves"),
    (105, "Fizz"),
    (106, "Volibear"),
    (107, "Rengar"),
    (110, "Varus"),
    (111, "Nautilus"),
    (112, "Viktor"),
    (113, "Sejuani"),
    (114, "Fiora"),
    (115, "Ziggs"),
    (117, "Lulu"),
    (119, "Draven"),
    (120, "Hecarim"),
    (121, "KhaZix"),
    (122, "Darius"),
    (126, "Jayce"),
    (127, "Lissandra"),
    (131, "Diana"),
    (133, "Quinn"),
    (134, "Syndra"),
    (136, "AurelionSol"),
    (141, "Kayn"),
    (142, "Zoe"),
    (143, "Zyra"),
    (145, "KaiSa"),
    (147, "Seraphine"),
    (150, "Gnar"),
    (154, "Zac"),
    (157, "Yasuo"),
    (161, "VelKoz"),
    (163, "Taliyah"),
    (164, "Camille"),
    (166, "Akshan"),
    (200, "BelVeth"),
    (201, "Braum"),
    (202, "Jhin"),
    (203, "Kindred"),
    (221, "Zeri"),
    (222, "Jinx"),
    (223, "TahmKench"),
    (233, "Briar"),
    (234, "Viego"),
    (235, "Senna"),
    (236, "Lucian"),
    (238, "Zed"),
    (240, "Kled"),
    (245, "Ekko"),
    (246, "Qiyana"),
    (254, "Vi"),
    (266, "Aatrox"),
    (267, "Nami"),
    (268, "Azir"),
    (350, "Yuumi"),
    (360, "Samira"),
    (412, "Thresh"),
    (420, "Illaoi"),
    (421, "RekSai"),
    (427, "Ivern"),
    (429, "Kalista"),
    (432, "Bard"),
    (497, "Rakan"),
    (498, "Xayah"),
    (516, "Ornn"),
    (517, "Sylas"),
    (518, "Neeko"),
    (523, "Aphelios"),
    (526, "Rell"),
    (555, "Pyke"),
    (711, "Vex"),
    (777, "Yone"),
    (875, "Sett"),
    (876, "Lillia"),
    (887, "Gwen"),
    (888, "Renata"),
    (893, "Aurora"),
    (895, "Nilah"),
    (897, "KSante"),
    (901, "Smolder"),
    (902, "Milio"),
    (903, "Ambessa"),
    (904, "Zaahen"),
    (910, "Hwei"),
    (950, "Naafiri"),
];

/// Bidirectional champion id <-> name mapping. Unknown ids resolve to a
/// synthesized `Champion_<id>` placeholder instead of failing, so a roster
/// gap never blocks mastery or matchup processing.
#[derive(Debug, Clone)]
pub struct ChampionRegistry {
    by_id: HashMap<i32, String>,
    by_name: HashMap<String, i32>,
}

impl ChampionRegistry {
    pub fn builtin() -> Self {
        let mut registry = ChampionRegistry {
            by_id: HashMap::new(),
            by_name: HashMap::new(),
        };
        for (id, name) in BUILTIN_CHAMPIONS {
            registry.insert(*id, name);
        }
        registry
    }

    pub fn insert(&mut self, id: i32, name: &str) {
        self.by_id.insert(id, name.to_string());
        self.by_name.insert(name.to_lowercase(), id);
    }

    pub fn name_of(&self, id: i32) -> String {
        self.by_id
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Champion_{}", id))
    }

    pub fn id_of(&self, name: &str) -> Option<i32> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Merge a Data Dragon champion payload, returning how many entries were
    /// new or renamed. Entries with a non-numeric key are skipped.
    pub fn merge_data_dragon(&mut self, payload: &DataDragonChampions) -> usize {
        let mut changed = 0;
        for info in payload.data.values() {
            let Ok(id) = info.key.parse::<i32>() else {
                continue;
            };
            if self.by_id.get(&id).map(String::as_str) != Some(info.id.as_str()) {
                self.insert(id, &info.id);
                changed += 1;
            }
        }
        changed
    }
}

impl Default for ChampionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::ChampionInfo;

    #[test]
    fn known_ids_resolve_to_names() {
        let registry = ChampionRegistry::builtin();
        assert_eq!(registry.name_of(22), "Ashe");
        assert_eq!(registry.name_of(412), "Thresh");
        assert_eq!(registry.name_of(777), "Yone");
    }

    #[test]
    fn unknown_ids_synthesize_placeholder() {
        let registry = ChampionRegistry::builtin();
        assert_eq!(registry.name_of(99999), "Champion_99999");
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        let registry = ChampionRegistry::builtin();
        assert_eq!(registry.id_of("ashe"), Some(22));
        assert_eq!(registry.id_of("MISSFORTUNE"), Some(21));
        assert_eq!(registry.id_of("NotAChampion"), None);
    }

    #[test]
    fn builtin_mapping_is_bijective() {
        let registry = ChampionRegistry::builtin();
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), BUILTIN_CHAMPIONS.len());
        for (id, name) in BUILTIN_CHAMPIONS {
            assert_eq!(registry.name_of(*id), *name);
            assert_eq!(registry.id_of(name), Some(*id));
        }
    }

    #[test]
    fn data_dragon_merge_adds_new_champions() {
        let mut registry = ChampionRegistry::builtin();
        let mut payload = DataDragonChampions {
            data: Default::default(),
        };
        payload.data.insert(
            "Newcomer".to_string(),
            ChampionInfo {
                id: "Newcomer".to_string(),
                name: "The Newcomer".to_string(),
                key: "960".to_string(),
            },
        );
        let changed = registry.merge_data_dragon(&payload);
        assert_eq!(changed, 1);
        assert_eq!(registry.name_of(960), "Newcomer");
        assert_eq!(registry.id_of("newcomer"), Some(960));
    }
}
