use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Placeholder carried by records that have not been inserted yet.
            pub const UNASSIGNED: Self = Self(0);

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

entity_id!(
    /// Identifier of a registered account.
    UserId
);
entity_id!(ChildId);
entity_id!(MilestoneId);
entity_id!(VaccineCardId);
entity_id!(VaccineId);
entity_id!(EventId);
entity_id!(PostId);
entity_id!(CommentId);
entity_id!(
    /// Identifier shared by parent and nutrition guides; both live in one table.
    GuideId
);
entity_id!(CategoryId);
entity_id!(NotificationId);
entity_id!(ContactId);
entity_id!(ArticleId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_numbers() {
        let json = serde_json::to_string(&ChildId(42)).expect("serializes");
        assert_eq!(json, "42");
        let parsed: GuideId = serde_json::from_str("7").expect("parses");
        assert_eq!(parsed, GuideId(7));
    }
}
