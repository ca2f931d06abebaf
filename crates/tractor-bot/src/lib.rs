pub mod analyzer;

pub use analyzer::{
    AnalyzerParams, DealAnalyzer, PlayerTracker, PropertyTypeInfo, SuitKnowledge, SureLead,
};
