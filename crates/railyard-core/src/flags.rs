//! Small bit-set types over closed flag enumerations.
//!
//! A flag set serializes as a list of snake_case flag names, so declaration
//! files read `triggers: [commit, pull_request]` rather than raw bits.

macro_rules! flag_set {
    (
        $(#[$set_meta:meta])*
        pub struct $set:ident;
        $(#[$flag_meta:meta])*
        pub enum $flag:ident {
            $($(#[$variant_meta:meta])* $variant:ident = $konst:ident = $bit:expr),+ $(,)?
        }
    ) => {
        $(#[$flag_meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            schemars::JsonSchema,
        )]
        #[serde(rename_all = "snake_case")]
        pub enum $flag {
            $($(#[$variant_meta])* $variant),+
        }

        impl $flag {
            pub const ALL: &'static [$flag] = &[$($flag::$variant),+];

            pub const fn bit(self) -> u8 {
                match self {
                    $($flag::$variant => $bit),+
                }
            }
        }

        $(#[$set_meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $set(u8);

        impl $set {
            $(pub const $konst: $set = $set($bit);)+

            pub const fn empty() -> Self {
                Self(0)
            }

            pub const fn bits(&self) -> u8 {
                self.0
            }

            pub const fn is_empty(&self) -> bool {
                self.0 == 0
            }

            /// True when every flag of `other` is set in `self`.
            pub const fn contains(&self, other: $set) -> bool {
                self.0 & other.0 == other.0
            }

            pub const fn intersects(&self, other: $set) -> bool {
                self.0 & other.0 != 0
            }

            pub fn insert(&mut self, other: impl Into<$set>) {
                self.0 |= other.into().0;
            }

            pub fn flags(&self) -> impl Iterator<Item = $flag> + '_ {
                $flag::ALL
                    .iter()
                    .copied()
                    .filter(move |flag| self.0 & flag.bit() != 0)
            }
        }

        impl From<$flag> for $set {
            fn from(flag: $flag) -> Self {
                Self(flag.bit())
            }
        }

        impl FromIterator<$flag> for $set {
            fn from_iter<I: IntoIterator<Item = $flag>>(iter: I) -> Self {
                iter.into_iter().fold(Self::empty(), |set, flag| set | $set::from(flag))
            }
        }

        impl std::ops::BitOr for $set {
            type Output = $set;

            fn bitor(self, rhs: $set) -> $set {
                $set(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $set {
            fn bitor_assign(&mut self, rhs: $set) {
                self.0 |= rhs.0;
            }
        }

        impl std::ops::BitAnd for $set {
            type Output = $set;

            fn bitand(self, rhs: $set) -> $set {
                $set(self.0 & rhs.0)
            }
        }

        impl std::fmt::Debug for $set {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_set().entries(self.flags()).finish()
            }
        }

        impl serde::Serialize for $set {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.collect_seq(self.flags())
            }
        }

        impl<'de> serde::Deserialize<'de> for $set {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let flags = <Vec<$flag> as serde::Deserialize>::deserialize(deserializer)?;
                Ok(flags.into_iter().collect())
            }
        }

        impl schemars::JsonSchema for $set {
            fn schema_name() -> String {
                stringify!($set).to_string()
            }

            fn json_schema(
                generator: &mut schemars::r#gen::SchemaGenerator,
            ) -> schemars::schema::Schema {
                <Vec<$flag> as schemars::JsonSchema>::json_schema(generator)
            }
        }
    };
}

pub(crate) use flag_set;
