pub mod analytics;
pub mod logits;
pub mod mappings;
pub mod node_metrics;
pub mod oracle;

pub use analytics::*;
pub use logits::*;
pub use mappings::*;
pub use node_metrics::*;
pub use oracle::*;
