pub mod bert;
pub mod distilbert;

pub use bert::BertClassifier;
pub use distilbert::DistilBertClassifier;
