// metadiff-core/src/domain/query.rs

use serde::{Deserialize, Serialize};

/// A named metadata query template. The name becomes the extract file name.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct QuerySpec {
    pub name: String,
    pub query: String,
}

/// Shape of a query set file: `queries: [{name, query}, ...]`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct QuerySet {
    #[serde(default)]
    pub queries: Vec<QuerySpec>,
}
