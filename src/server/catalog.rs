use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Two sample movie reviews per sentiment level, most negative first.
const EXAMPLES: [(i8, [&str; 2]); 7] = [
    (
        -3,
        [
            "This movie was absolutely terrible! Worst film I've ever seen.",
            "Complete waste of time and money. Awful in every way.",
        ],
    ),
    (
        -2,
        [
            "Very disappointing. Poor acting and weak plot.",
            "Not good at all. Would not recommend.",
        ],
    ),
    (
        -1,
        [
            "The movie had potential but didn't deliver.",
            "Below average. Some moments but mostly forgettable.",
        ],
    ),
    (
        0,
        [
            "It was okay. Nothing particularly special.",
            "Average film. Neither good nor bad.",
        ],
    ),
    (
        1,
        [
            "Pretty decent movie. I enjoyed parts of it.",
            "Good film with some nice moments.",
        ],
    ),
    (
        2,
        [
            "Really great movie! Thoroughly enjoyed it.",
            "Excellent film with strong performances.",
        ],
    ),
    (
        3,
        [
            "Absolutely amazing! Best movie I've seen this year!",
            "Masterpiece! Incredible in every way!",
        ],
    ),
];

/// Serializes as `{"-3": [..], ..., "3": [..]}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExampleCatalog;

impl ExampleCatalog {
    pub fn examples_for(score: i8) -> Option<&'static [&'static str]> {
        EXAMPLES
            .iter()
            .find(|(level, _)| *level == score)
            .map(|(_, reviews)| reviews.as_slice())
    }

    pub fn iter() -> impl Iterator<Item = (i8, &'static [&'static str])> {
        EXAMPLES
            .iter()
            .map(|(level, reviews)| (*level, reviews.as_slice()))
    }
}

impl Serialize for ExampleCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(EXAMPLES.len()))?;
        for (level, reviews) in Self::iter() {
            map.serialize_entry(&level.to_string(), reviews)?;
        }
        map.end()
    }
}
