//! Closed key sets that index the rule tables.

/// A closed set of keys naming rows of one rule table.
pub trait RuleKey: Copy + Ord + std::fmt::Display {
    /// Name of the rule table these keys index, used in error messages.
    const TABLE: &'static str;
}

/// Declare a closed, snake_case-keyed enum with parsing and display.
///
/// Parsing an unrecognized key fails with
/// [`GameError::InvalidModifierKey`](crate::error::GameError::InvalidModifierKey).
macro_rules! rule_key {
    (
        $(#[$meta:meta])*
        pub enum $name:ident in $table:literal {
            $($(#[$vmeta:meta])* $variant:ident => $key:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every key, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Snake-case key used in rule files and on the command line.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $key),+
                }
            }
        }

        impl $crate::data::RuleKey for $name {
            const TABLE: &'static str = $table;
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::GameError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($key => Ok(Self::$variant),)+
                    _ => Err($crate::error::GameError::InvalidModifierKey {
                        table: $table,
                        key: s.to_string(),
                    }),
                }
            }
        }
    };
}

rule_key! {
    /// Unit classes used by the advantage matrix.
    pub enum UnitType in "unit type" {
        /// Line infantry.
        Infantry => "infantry",
        /// Ranged foot units.
        Archer => "archer",
        /// Mounted units.
        Cavalry => "cavalry",
        /// Siege engines.
        Siege => "siege",
        /// Static structures. Can be attacked, never attacks.
        Building => "building",
    }
}

rule_key! {
    /// Terrain the combat takes place on.
    pub enum Terrain in "terrain" {
        /// Open ground.
        Plains => "plains",
        /// Woodland, favours the defender.
        Forest => "forest",
        /// Elevated ground.
        Hills => "hills",
        /// Steep high ground.
        Mountains => "mountains",
        /// Exposed dry ground.
        Desert => "desert",
        /// Boggy ground, hampers everyone.
        Swamp => "swamp",
    }
}

rule_key! {
    /// Weather during the combat.
    pub enum Weather in "weather" {
        /// No weather effects.
        Clear => "clear",
        /// Rain.
        Rain => "rain",
        /// Fog.
        Fog => "fog",
        /// Snow.
        Snow => "snow",
        /// Storm.
        Storm => "storm",
    }
}

rule_key! {
    /// Attacker formation.
    pub enum Formation in "formation" {
        /// Standard line.
        Line => "line",
        /// Aggressive wedge.
        Wedge => "wedge",
        /// Tight defensive block.
        Phalanx => "phalanx",
        /// Loose skirmish order.
        Skirmish => "skirmish",
    }
}

rule_key! {
    /// Special abilities an attacker can have active.
    pub enum Ability in "ability" {
        /// Mounted charge.
        Charge => "charge",
        /// Locked shields.
        ShieldWall => "shield_wall",
        /// Massed ranged volley.
        Volley => "volley",
        /// Siege bombardment.
        Bombard => "bombard",
        /// Rallying cry.
        Rally => "rally",
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Self::Plains
    }
}

impl Default for Weather {
    fn default() -> Self {
        Self::Clear
    }
}

impl Default for Formation {
    fn default() -> Self {
        Self::Line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    #[test]
    fn test_parse_known_keys() {
        assert_eq!("forest".parse::<Terrain>().unwrap(), Terrain::Forest);
        assert_eq!("shield_wall".parse::<Ability>().unwrap(), Ability::ShieldWall);
        assert_eq!("cavalry".parse::<UnitType>().unwrap(), UnitType::Cavalry);
    }

    #[test]
    fn test_parse_unknown_key() {
        let err = "lava".parse::<Terrain>().unwrap_err();
        match err {
            GameError::InvalidModifierKey { table, key } => {
                assert_eq!(table, "terrain");
                assert_eq!(key, "lava");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_display_matches_serde_name() {
        for ability in Ability::ALL {
            let text = ron::to_string(ability).unwrap();
            assert_eq!(text, ability.as_str());
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Terrain::default(), Terrain::Plains);
        assert_eq!(Weather::default(), Weather::Clear);
        assert_eq!(Formation::default(), Formation::Line);
    }
}
