pub mod collate;
pub mod criteria;
pub mod pipeline;
pub mod relations;
pub mod relevance;
pub mod topics;

pub use criteria::{FilterCriteria, SearchMode};
pub use pipeline::{apply, page_count, QueryPage, PAGE_SIZE};
pub use relations::{Relation, RelationGraph};
pub use relevance::MatchFields;
pub use topics::topics_for_level;
