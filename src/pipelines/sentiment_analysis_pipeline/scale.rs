//! The 7-point sentiment scale and the mapping from class probabilities to a
//! [`SentimentResult`].
//!
//! Class index `i` in `0..7` corresponds to score `i - 3`, so index 0 is
//! "Very Negative" (-3) and index 6 is "Very Positive" (+3).

use crate::core::InferenceError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Width of every classification head this crate serves.
pub const NUM_CLASSES: usize = 7;

/// Subtracted from a class index to obtain its score.
pub const SCORE_OFFSET: i8 = 3;

pub const MIN_SCORE: i8 = -SCORE_OFFSET;
pub const MAX_SCORE: i8 = SCORE_OFFSET;

const LABELS: [&str; NUM_CLASSES] = [
    "Very Negative",
    "Negative",
    "Slightly Negative",
    "Neutral",
    "Slightly Positive",
    "Positive",
    "Very Positive",
];

const EMOJIS: [&str; NUM_CLASSES] = ["😢", "😞", "😐", "😶", "🙂", "😊", "🤩"];

/// A point on the -3..=3 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SentimentScore(i8);

impl SentimentScore {
    pub fn from_class_index(index: usize) -> Option<Self> {
        (index < NUM_CLASSES).then(|| Self(index as i8 - SCORE_OFFSET))
    }

    pub fn new(score: i8) -> Option<Self> {
        (MIN_SCORE..=MAX_SCORE).contains(&score).then_some(Self(score))
    }

    /// All seven scores, most negative first.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..NUM_CLASSES).filter_map(Self::from_class_index)
    }

    pub fn value(self) -> i8 {
        self.0
    }

    pub fn class_index(self) -> usize {
        (self.0 + SCORE_OFFSET) as usize
    }

    pub fn label(self) -> &'static str {
        LABELS[self.class_index()]
    }

    pub fn emoji(self) -> &'static str {
        EMOJIS[self.class_index()]
    }

    /// Key used in the probability map, e.g. `+2 (Positive)` or `+0 (Neutral)`.
    pub fn probability_key(self) -> String {
        format!("{:+} ({})", self.0, self.label())
    }
}

impl fmt::Display for SentimentScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

/// Softmax output of a 7-way head, indexed by class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities([f32; NUM_CLASSES]);

impl ClassProbabilities {
    pub fn new(values: [f32; NUM_CLASSES]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[f32; NUM_CLASSES] {
        &self.0
    }

    pub fn get(&self, score: SentimentScore) -> f32 {
        self.0[score.class_index()]
    }

    /// Index of the largest probability. Ties go to the lowest index and NaN
    /// entries never win.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (index, &p) in self.0.iter().enumerate().skip(1) {
            if p > self.0[best] || (self.0[best].is_nan() && !p.is_nan()) {
                best = index;
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (SentimentScore, f32)> + '_ {
        SentimentScore::all().map(move |score| (score, self.get(score)))
    }
}

impl TryFrom<Vec<f32>> for ClassProbabilities {
    type Error = InferenceError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        let found = values.len();
        let values: [f32; NUM_CLASSES] =
            values.try_into().map_err(|_| InferenceError::ClassCount {
                expected: NUM_CLASSES,
                found,
            })?;
        Ok(Self(values))
    }
}

/// Serialized as a JSON object keyed by [`SentimentScore::probability_key`],
/// most negative class first.
impl Serialize for ClassProbabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(NUM_CLASSES))?;
        for (score, p) in self.iter() {
            map.serialize_entry(&score.probability_key(), &p)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ClassProbabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ProbabilitiesVisitor;

        impl<'de> Visitor<'de> for ProbabilitiesVisitor {
            type Value = ClassProbabilities;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of the seven sentiment classes to probabilities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut values = [None; NUM_CLASSES];
                while let Some((key, p)) = access.next_entry::<String, f32>()? {
                    let score = SentimentScore::all()
                        .find(|s| s.probability_key() == key)
                        .ok_or_else(|| serde::de::Error::custom(format!("unknown class `{key}`")))?;
                    values[score.class_index()] = Some(p);
                }
                let mut out = [0.0; NUM_CLASSES];
                for (slot, value) in out.iter_mut().zip(values) {
                    *slot = value.ok_or_else(|| serde::de::Error::custom("missing class"))?;
                }
                Ok(ClassProbabilities(out))
            }
        }

        deserializer.deserialize_map(ProbabilitiesVisitor)
    }
}

/// Outcome of analyzing one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub text: String,
    pub sentiment_score: i8,
    pub sentiment_label: String,
    pub emoji: String,
    pub confidence: f32,
    pub probabilities: ClassProbabilities,
}

impl SentimentResult {
    /// Maps a probability vector onto the scale.
    pub fn from_probabilities(text: impl Into<String>, probabilities: ClassProbabilities) -> Self {
        let predicted = probabilities.argmax();
        // argmax is always < NUM_CLASSES
        let score = SentimentScore(predicted as i8 - SCORE_OFFSET);

        Self {
            text: text.into(),
            sentiment_score: score.value(),
            sentiment_label: score.label().to_string(),
            emoji: score.emoji().to_string(),
            confidence: probabilities.as_array()[predicted],
            probabilities,
        }
    }

    pub fn score(&self) -> Option<SentimentScore> {
        SentimentScore::new(self.sentiment_score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleEntry {
    pub label: String,
    pub emoji: String,
}

/// The full scale keyed by score, for display.
pub fn sentiment_scale() -> BTreeMap<i8, ScaleEntry> {
    SentimentScore::all()
        .map(|score| {
            (
                score.value(),
                ScaleEntry {
                    label: score.label().to_string(),
                    emoji: score.emoji().to_string(),
                },
            )
        })
        .collect()
}
