//! Shared field types for battle protocol messages

/// Player slot marker (p1 or p2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideId {
    P1,
    P2,
}

impl SideId {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "p1" => Some(SideId::P1),
            "p2" => Some(SideId::P2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SideId::P1 => "p1",
            SideId::P2 => "p2",
        }
    }

    pub fn opponent(&self) -> SideId {
        match self {
            SideId::P1 => SideId::P2,
            SideId::P2 => SideId::P1,
        }
    }
}

/// Actor reference in the form "POSITION: NAME" (e.g., "p1a: Bronzong").
///
/// The protocol names actors by side-qualified display name rather than a
/// stable id, so parsing is lenient: a missing or unknown side marker
/// yields `side: None` and the whole string becomes the name.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorRef {
    /// Side marker, when the position prefix carried a known one.
    pub side: Option<SideId>,
    /// Position letter (a/b for active slots), when present.
    pub position: Option<char>,
    /// Display name (nickname or species).
    pub name: String,
}

impl ActorRef {
    pub fn parse(s: &str) -> Self {
        match s.split_once(": ") {
            Some((pos, name)) => {
                // get() rather than slicing: a prefix starting mid-char
                // must degrade to an unknown side, not panic
                let side = pos.get(..2).and_then(SideId::parse);
                ActorRef {
                    side,
                    position: pos.chars().nth(2),
                    name: name.to_string(),
                }
            }
            None => ActorRef {
                side: None,
                position: None,
                name: s.to_string(),
            },
        }
    }
}

/// Parsed HP fraction from a condition string.
///
/// Derivable only from the "CURRENT/MAX" form; "0 fnt" and other
/// non-numeric conditions yield no value at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HpStat {
    pub current: u32,
    pub max: u32,
    /// floor(current / max * 100)
    pub percentage: u32,
}

impl HpStat {
    /// Parse a condition string like "45/100" or "45/100 par".
    pub fn parse(condition: &str) -> Option<Self> {
        let hp_part = condition.split_whitespace().next()?;
        let (current, max) = hp_part.split_once('/')?;
        let current: u32 = current.parse().ok()?;
        let max: u32 = max.parse().ok()?;

        Some(HpStat {
            current,
            max,
            percentage: if max > 0 { current * 100 / max } else { 0 },
        })
    }
}

/// The status part of a condition string ("45/100 par" -> "par").
pub fn condition_status(condition: &str) -> Option<String> {
    condition.split_whitespace().nth(1).map(str::to_string)
}

/// Boostable stat key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoostStat {
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
    Accuracy,
    Evasion,
}

impl BoostStat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "atk" => Some(BoostStat::Atk),
            "def" => Some(BoostStat::Def),
            "spa" => Some(BoostStat::Spa),
            "spd" => Some(BoostStat::Spd),
            "spe" => Some(BoostStat::Spe),
            "accuracy" => Some(BoostStat::Accuracy),
            "evasion" => Some(BoostStat::Evasion),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoostStat::Atk => "atk",
            BoostStat::Def => "def",
            BoostStat::Spa => "spa",
            BoostStat::Spd => "spd",
            BoostStat::Spe => "spe",
            BoostStat::Accuracy => "accuracy",
            BoostStat::Evasion => "evasion",
        }
    }

    pub const ALL: [BoostStat; 7] = [
        BoostStat::Atk,
        BoostStat::Def,
        BoostStat::Spa,
        BoostStat::Spd,
        BoostStat::Spe,
        BoostStat::Accuracy,
        BoostStat::Evasion,
    ];
}
