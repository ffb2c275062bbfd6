//! Static label catalog: branches, their groups, and each group's artists.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch {
    pub name: &'static str,
    pub groups: &'static [&'static str],
}

pub const BRANCHES: &[Branch] = &[
    Branch { name: "BigHit Music", groups: &["BTS", "TXT"] },
    Branch { name: "PLEDIS Entertainment", groups: &["SEVENTEEN", "fromis_9"] },
    Branch { name: "BELIFT LAB", groups: &["ENHYPEN", "ILLIT"] },
    Branch { name: "KOZ Entertainment", groups: &["ZICO"] },
    Branch { name: "ADOR", groups: &["NewJeans"] },
    Branch { name: "HYBE Labels Japan", groups: &["&TEAM"] },
];

pub fn branch(name: &str) -> Option<&'static Branch> {
    BRANCHES.iter().find(|b| b.name == name)
}

/// Groups offered for a branch; empty for unknown branches.
pub fn groups_for(branch_name: &str) -> &'static [&'static str] {
    branch(branch_name).map(|b| b.groups).unwrap_or(&[])
}

/// Artists offered for a group; empty for unknown groups.
pub fn artists_for(group: &str) -> &'static [&'static str] {
    match group {
        "BTS" => &["RM", "Jin", "SUGA", "j-hope", "Jimin", "V", "Jung Kook"],
        "TXT" => &["SOOBIN", "YEONJUN", "BEOMGYU", "TAEHYUN", "HUENINGKAI"],
        "SEVENTEEN" => &[
            "S.COUPS", "JEONGHAN", "JOSHUA", "JUN", "HOSHI", "WONWOO", "WOOZI", "THE 8",
            "MINGYU", "DK", "SEUNGKWAN", "VERNON", "DINO",
        ],
        "fromis_9" => &[
            "LEE SAEROM", "SONG HAYOUNG", "PARK JIWON", "ROH JISUN", "LEE SEOYEON",
            "LEE CHAEYOUNG", "LEE NAGYUNG", "BAEK JIHEON",
        ],
        "ENHYPEN" => &["JUNGWON", "HEESEUNG", "JAY", "JAKE", "SUNGHOON", "SUNOO", "NI-KI"],
        "ILLIT" => &["YUNAH", "MINJU", "MOKA", "WONHEE", "IROHA"],
        "ZICO" => &["ZICO"],
        "NewJeans" => &["MINJI", "HANNI", "DANIELLE", "HAERIN", "HYEIN"],
        "&TEAM" => &["K", "FUMA", "NICHOLAS", "EJ", "YUMA", "JO", "HARUA", "TAKI", "MAKI"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_group_has_artists() {
        for branch in BRANCHES {
            for group in branch.groups {
                assert!(!artists_for(group).is_empty(), "{group}");
            }
        }
    }

    #[test]
    fn unknown_keys_yield_nothing() {
        assert!(groups_for("SM Entertainment").is_empty());
        assert!(artists_for("").is_empty());
        assert_eq!(groups_for("ADOR"), &["NewJeans"]);
    }
}
