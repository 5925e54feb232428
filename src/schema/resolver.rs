//! Column type resolution.
//!
//! A column's semantic type comes from the first strategy in the chain that knows
//! it: explicit overrides, then declared casts, then the storage type reported
//! by the schema, then [`SemanticType::Unknown`].

use super::inspector::SchemaInspector;
use super::types::{cast_semantic_type, storage_semantic_type, ColumnInfo, SemanticType};
use crate::error::Result;
use crate::model::ModelMeta;
use std::collections::HashMap;

/// One link of the resolution chain.
pub trait TypeStrategy {
    fn resolve(&self, column: &str) -> Option<SemanticType>;
}

/// Per-model explicit types.
pub struct OverrideStrategy {
    types: HashMap<String, SemanticType>,
}

impl OverrideStrategy {
    pub fn new(overrides: &[(String, SemanticType)]) -> Self {
        Self {
            types: overrides.iter().cloned().collect(),
        }
    }
}

impl TypeStrategy for OverrideStrategy {
    fn resolve(&self, column: &str) -> Option<SemanticType> {
        self.types.get(column).copied()
    }
}

/// Model-declared casts, normalised through [`cast_semantic_type`].
pub struct CastStrategy {
    casts: HashMap<String, String>,
}

impl CastStrategy {
    pub fn new(casts: &[(String, String)]) -> Self {
        Self {
            casts: casts.iter().cloned().collect(),
        }
    }
}

impl TypeStrategy for CastStrategy {
    fn resolve(&self, column: &str) -> Option<SemanticType> {
        self.casts.get(column).and_then(|cast| cast_semantic_type(cast))
    }
}

/// Storage types reported by the schema, normalised through [`storage_semantic_type`].
pub struct StorageStrategy {
    storage: HashMap<String, String>,
}

impl StorageStrategy {
    pub fn new(columns: &[ColumnInfo]) -> Self {
        Self {
            storage: columns
                .iter()
                .map(|c| (c.name.clone(), c.storage_type.clone()))
                .collect(),
        }
    }
}

impl TypeStrategy for StorageStrategy {
    fn resolve(&self, column: &str) -> Option<SemanticType> {
        self.storage
            .get(column)
            .and_then(|storage| storage_semantic_type(storage))
    }
}

/// Ordered chain of strategies with an `Unknown` fallback.
pub struct ColumnResolver {
    strategies: Vec<Box<dyn TypeStrategy>>,
}

impl ColumnResolver {
    pub fn new(strategies: Vec<Box<dyn TypeStrategy>>) -> Self {
        Self { strategies }
    }

    /// The standard chain for a model: overrides, casts, then `columns`' storage types.
    pub fn for_model(meta: &ModelMeta, columns: &[ColumnInfo]) -> Self {
        Self::new(vec![
            Box::new(OverrideStrategy::new(meta.type_overrides())),
            Box::new(CastStrategy::new(meta.casts())),
            Box::new(StorageStrategy::new(columns)),
        ])
    }

    pub fn resolve(&self, column: &str) -> SemanticType {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.resolve(column))
            .unwrap_or(SemanticType::Unknown)
    }
}

/// A column requested by the caller, optionally with a type that wins over inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedColumn {
    pub name: String,
    pub semantic: Option<SemanticType>,
}

impl RequestedColumn {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            semantic: None,
        }
    }

    pub fn typed(name: impl Into<String>, semantic: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic: Some(semantic),
        }
    }
}

/// Resolve column types for `meta`'s table.
///
/// Without `requested` every physical column is returned in table order. With a
/// requested list the result has exactly those names in that order; a caller type
/// wins, otherwise the column resolves through the chain (`Unknown` if the table
/// does not have it).
pub fn resolve_columns(
    inspector: &dyn SchemaInspector,
    meta: &ModelMeta,
    requested: Option<&[RequestedColumn]>,
) -> Result<Vec<(String, SemanticType)>> {
    if let Some(requested) = requested {
        let all_typed = requested.iter().all(|c| c.semantic.is_some());
        if all_typed {
            return Ok(requested
                .iter()
                .map(|c| (c.name.clone(), c.semantic.unwrap_or(SemanticType::Unknown)))
                .collect());
        }
    }

    let columns = inspector.columns(meta.table_name())?;
    let resolver = ColumnResolver::for_model(meta, &columns);
    let resolved: HashMap<&str, SemanticType> = columns
        .iter()
        .map(|c| (c.name.as_str(), resolver.resolve(&c.name)))
        .collect();

    let types = match requested {
        None => columns
            .iter()
            .map(|c| (c.name.clone(), resolved[c.name.as_str()]))
            .collect(),
        Some(requested) => requested
            .iter()
            .map(|c| {
                let semantic = c.semantic.unwrap_or_else(|| {
                    resolved
                        .get(c.name.as_str())
                        .copied()
                        .unwrap_or(SemanticType::Unknown)
                });
                (c.name.clone(), semantic)
            })
            .collect(),
    };
    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StaticSchema;

    fn schema() -> StaticSchema {
        StaticSchema::new().table(
            "posts",
            vec![
                ColumnInfo::new("id", "bigint"),
                ColumnInfo::new("title", "character varying"),
                ColumnInfo::new("price", "numeric"),
                ColumnInfo::new("meta", "text"),
                ColumnInfo::new("rank", "tsvector"),
            ],
        )
    }

    fn post() -> ModelMeta {
        ModelMeta::new("Post").cast("meta", "array").cast("price", "integer")
    }

    #[test]
    fn test_priority_chain() {
        let meta = post().column_type("price", SemanticType::Decimal);
        let types = resolve_columns(&schema(), &meta, None).unwrap();
        assert_eq!(
            types,
            vec![
                ("id".to_string(), SemanticType::Int),
                ("title".to_string(), SemanticType::String),
                // override beats the integer cast
                ("price".to_string(), SemanticType::Decimal),
                // cast beats the text storage type
                ("meta".to_string(), SemanticType::Json),
                ("rank".to_string(), SemanticType::Unknown),
            ]
        );
    }

    #[test]
    fn test_requested_list_keeps_names_and_order() {
        let requested = vec![
            RequestedColumn::named("title"),
            RequestedColumn::named("missing"),
            RequestedColumn::named("id"),
        ];
        let types = resolve_columns(&schema(), &post(), Some(&requested)).unwrap();
        let names: Vec<&str> = types.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["title", "missing", "id"]);
        assert_eq!(types[1].1, SemanticType::Unknown);
    }

    #[test]
    fn test_caller_type_wins_and_rest_resolve() {
        let requested = vec![
            RequestedColumn::typed("title", SemanticType::Text),
            RequestedColumn::named("id"),
        ];
        let types = resolve_columns(&schema(), &post(), Some(&requested)).unwrap();
        assert_eq!(types[0], ("title".to_string(), SemanticType::Text));
        assert_eq!(types[1], ("id".to_string(), SemanticType::Int));
    }

    #[test]
    fn test_fully_typed_request_skips_introspection() {
        // The table is unknown to the inspector; no lookup may happen.
        let requested = vec![RequestedColumn::typed("anything", SemanticType::Year)];
        let meta = ModelMeta::new("Ghost");
        let types = resolve_columns(&StaticSchema::new(), &meta, Some(&requested)).unwrap();
        assert_eq!(types, vec![("anything".to_string(), SemanticType::Year)]);
    }
}
