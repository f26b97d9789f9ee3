pub use crate::operations::operation_ids;
use crate::operations::{
    Base64DecodeConfig, Base64EncodeConfig, HexDecodeConfig, HexEncodeConfig, OperationConfig,
    TransformError, UrlDecodeConfig, UrlEncodeConfig,
};
use std::collections::HashMap;
use std::mem::discriminant;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy)]
pub struct Operation {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub defaults: OperationConfig,
}

impl Operation {
    pub fn default_config(&self) -> OperationConfig {
        self.defaults
    }

    /// Runs the operation. A config whose variant belongs to another operation is
    /// rejected here rather than when the step is edited.
    pub fn transform(
        &self,
        input: &str,
        config: &OperationConfig,
    ) -> Result<String, TransformError> {
        if discriminant(config) != discriminant(&self.defaults) {
            return Err(TransformError::ConfigMismatch {
                expected: self.id,
                found: config.operation_id(),
            });
        }
        config.apply(input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("operation id `{id}` is registered more than once")]
    DuplicateOperation { id: String },
}

#[derive(Debug, Clone)]
pub struct OperationGroup<'a> {
    pub category: &'static str,
    pub operations: Vec<&'a Operation>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    operations: Vec<Operation>,
    index: HashMap<&'static str, usize>,
    groups: Vec<(&'static str, Vec<usize>)>,
}

impl Catalog {
    pub fn new(operations: Vec<Operation>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(operations.len());
        let mut groups: Vec<(&'static str, Vec<usize>)> = Vec::new();
        for (position, operation) in operations.iter().enumerate() {
            if index.insert(operation.id, position).is_some() {
                return Err(CatalogError::DuplicateOperation {
                    id: operation.id.to_string(),
                });
            }
            match groups
                .iter_mut()
                .find(|(category, _)| *category == operation.category)
            {
                Some((_, members)) => members.push(position),
                None => groups.push((operation.category, vec![position])),
            }
        }
        Ok(Self {
            operations,
            index,
            groups,
        })
    }

    /// Process-wide catalog of built-in operations, built on first use.
    pub fn builtin() -> &'static Catalog {
        static BUILTIN: OnceLock<Catalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Catalog::new(builtin_operations()).expect("builtin operation ids are unique")
        })
    }

    pub fn lookup(&self, id: &str) -> Option<&Operation> {
        self.index
            .get(id)
            .and_then(|position| self.operations.get(*position))
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Categories in first-seen order; members keep declaration order.
    pub fn groups(&self) -> Vec<OperationGroup<'_>> {
        self.groups
            .iter()
            .map(|(category, members)| OperationGroup {
                category: *category,
                operations: members
                    .iter()
                    .filter_map(|position| self.operations.get(*position))
                    .collect(),
            })
            .collect()
    }
}

fn builtin_operations() -> Vec<Operation> {
    vec![
        Operation {
            id: operation_ids::URL_DECODE,
            name: "URL Decode",
            category: "URL",
            description: "Percent-decode a URL component",
            defaults: OperationConfig::UrlDecode(UrlDecodeConfig::default()),
        },
        Operation {
            id: operation_ids::URL_ENCODE,
            name: "URL Encode",
            category: "URL",
            description: "Percent-encode text as a URL component",
            defaults: OperationConfig::UrlEncode(UrlEncodeConfig::default()),
        },
        Operation {
            id: operation_ids::BASE64_DECODE,
            name: "Base64 Decode",
            category: "Base64",
            description: "Decode Base64 into UTF-8 text",
            defaults: OperationConfig::Base64Decode(Base64DecodeConfig::default()),
        },
        Operation {
            id: operation_ids::BASE64_ENCODE,
            name: "Base64 Encode",
            category: "Base64",
            description: "Encode UTF-8 text as Base64",
            defaults: OperationConfig::Base64Encode(Base64EncodeConfig::default()),
        },
        Operation {
            id: operation_ids::HEX_DECODE,
            name: "Hex Decode",
            category: "Hex",
            description: "Decode hexadecimal into UTF-8 text",
            defaults: OperationConfig::HexDecode(HexDecodeConfig::default()),
        },
        Operation {
            id: operation_ids::HEX_ENCODE,
            name: "Hex Encode",
            category: "Hex",
            description: "Encode UTF-8 text as hexadecimal",
            defaults: OperationConfig::HexEncode(HexEncodeConfig::default()),
        },
        Operation {
            id: operation_ids::HTML_DECODE,
            name: "HTML Decode",
            category: "HTML",
            description: "Replace HTML entities with the characters they stand for",
            defaults: OperationConfig::HtmlDecode,
        },
        Operation {
            id: operation_ids::HTML_ENCODE,
            name: "HTML Encode",
            category: "HTML",
            description: "Escape text so a browser does not parse it as markup",
            defaults: OperationConfig::HtmlEncode,
        },
        Operation {
            id: operation_ids::UNICODE_ESCAPE,
            name: "Unicode Escape",
            category: "Unicode",
            description: "Write non-printable and non-ASCII characters as \\u escapes",
            defaults: OperationConfig::UnicodeEscape,
        },
        Operation {
            id: operation_ids::UNICODE_UNESCAPE,
            name: "Unicode Unescape",
            category: "Unicode",
            description: "Turn \\u escape sequences back into characters",
            defaults: OperationConfig::UnicodeUnescape,
        },
    ]
}
