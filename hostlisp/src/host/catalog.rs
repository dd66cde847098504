//! TOML-described host type catalog.
//!
//! ```toml
//! [[types]]
//! name = "System.Math"
//!
//! [[types.fields]]
//! name = "PI"
//! type = "System.Double"
//! static = true
//!
//! [[types.methods]]
//! name = "Abs"
//! params = ["System.Double"]
//! returns = "System.Double"
//! static = true
//! ```
//!
//! Primitive types, `System.Void`, `System.Object` and `System.String` are
//! always known, with or without a declaration. A type name ending in `[]`
//! names an array of the element type; array members come from the
//! `System.Array` declaration when one exists.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::{FieldInfo, MemberResolver, MethodInfo, PropertyInfo, TypeLookup};
use crate::types::{
    HostType, PrimitiveKind, ARRAY_SUFFIX, OBJECT_TYPE_NAME, STRING_TYPE_NAME, VOID_TYPE_NAME,
};

/// The embedded `System` subset.
pub const BUILTIN_CATALOG: &str = include_str!("builtin.toml");

const ARRAY_TYPE_NAME: &str = "System.Array";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown type `{type_name}` referenced by {referenced_by}")]
    UnknownType {
        type_name: String,
        referenced_by: String,
    },

    #[error("type `{0}` is declared twice")]
    DuplicateType(String),

    #[error("cannot read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    types: Vec<TypeDecl>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindDecl {
    #[default]
    Class,
    Struct,
}

#[derive(Debug, Deserialize)]
struct TypeDecl {
    name: String,
    #[serde(default)]
    kind: KindDecl,
    base: Option<String>,
    #[serde(default)]
    fields: Vec<FieldDecl>,
    #[serde(default)]
    properties: Vec<PropertyDecl>,
    #[serde(default)]
    methods: Vec<MethodDecl>,
}

#[derive(Debug, Deserialize)]
struct FieldDecl {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default, rename = "static")]
    is_static: bool,
}

#[derive(Debug, Deserialize)]
struct PropertyDecl {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default, rename = "static")]
    is_static: bool,
    #[serde(default)]
    writable: bool,
}

#[derive(Debug, Deserialize)]
struct MethodDecl {
    name: String,
    #[serde(default)]
    params: Vec<String>,
    /// Absent means `System.Void`
    returns: Option<String>,
    #[serde(default, rename = "static")]
    is_static: bool,
    #[serde(default)]
    generic_arity: usize,
}

#[derive(Debug, Clone)]
struct CatalogType {
    ty: HostType,
    base: Option<String>,
    fields: Vec<FieldInfo>,
    properties: Vec<PropertyInfo>,
    methods: Vec<MethodInfo>,
}

impl CatalogType {
    fn intrinsic(ty: HostType) -> Self {
        Self {
            ty,
            base: None,
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }
}

/// In-memory host metadata implementing [`TypeLookup`] and [`MemberResolver`].
#[derive(Debug, Clone)]
pub struct HostCatalog {
    types: HashMap<String, CatalogType>,
    /// Names declared by a catalog source (as opposed to intrinsic)
    declared: HashSet<String>,
}

impl Default for HostCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

impl HostCatalog {
    /// A catalog holding only the intrinsic types.
    pub fn empty() -> Self {
        let mut types = HashMap::new();
        for kind in PrimitiveKind::ALL {
            types.insert(
                kind.type_name().to_string(),
                CatalogType::intrinsic(HostType::Primitive(kind)),
            );
        }
        types.insert(
            VOID_TYPE_NAME.to_string(),
            CatalogType::intrinsic(HostType::Void),
        );
        types.insert(
            OBJECT_TYPE_NAME.to_string(),
            CatalogType::intrinsic(HostType::object()),
        );
        types.insert(
            STRING_TYPE_NAME.to_string(),
            CatalogType::intrinsic(HostType::string()),
        );
        Self {
            types,
            declared: HashSet::new(),
        }
    }

    /// The embedded `System` subset.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let mut catalog = Self::empty();
        catalog.extend_from_toml_str(source)?;
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let mut catalog = Self::empty();
        catalog.extend_from_path(path)?;
        Ok(catalog)
    }

    pub fn extend_from_path(&mut self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.extend_from_toml_str(&source)
    }

    /// Add the declarations in `source`. Member signatures may refer to any
    /// type already in the catalog or declared in the same source.
    ///
    /// On error the catalog is left unchanged.
    pub fn extend_from_toml_str(&mut self, source: &str) -> Result<(), CatalogError> {
        let file: CatalogFile = toml::from_str(source)?;

        // Pass 1: register names so members can refer to types declared later.
        let mut staged = self.clone();
        for decl in &file.types {
            if !staged.declared.insert(decl.name.clone()) {
                return Err(CatalogError::DuplicateType(decl.name.clone()));
            }
            let ty = match PrimitiveKind::from_type_name(&decl.name) {
                Some(kind) => HostType::Primitive(kind),
                None if decl.name == VOID_TYPE_NAME => HostType::Void,
                None => match decl.kind {
                    KindDecl::Class => HostType::Class(decl.name.clone()),
                    KindDecl::Struct => HostType::Struct(decl.name.clone()),
                },
            };
            staged
                .types
                .insert(decl.name.clone(), CatalogType::intrinsic(ty));
        }

        // Pass 2: resolve member signatures.
        for decl in file.types {
            let entry = staged.build_entry(decl)?;
            staged.types.insert(entry.ty.name(), entry);
        }

        *self = staged;
        Ok(())
    }

    fn build_entry(&self, decl: TypeDecl) -> Result<CatalogType, CatalogError> {
        let owner = decl.name.clone();
        let ty = self
            .types
            .get(&owner)
            .map(|entry| entry.ty.clone())
            .ok_or_else(|| CatalogError::UnknownType {
                type_name: owner.clone(),
                referenced_by: "catalog".to_string(),
            })?;

        let resolve = |name: &str, member: &str| -> Result<HostType, CatalogError> {
            self.find_type(name).ok_or_else(|| CatalogError::UnknownType {
                type_name: name.to_string(),
                referenced_by: format!("{}.{}", owner, member),
            })
        };

        let base = match decl.base {
            Some(base) => {
                resolve(&base, "<base>")?;
                Some(base)
            }
            None => None,
        };

        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in decl.fields {
            fields.push(FieldInfo {
                declaring_type: ty.clone(),
                field_type: resolve(&field.ty, &field.name)?,
                name: field.name,
                is_static: field.is_static,
            });
        }

        let mut properties = Vec::with_capacity(decl.properties.len());
        for prop in decl.properties {
            properties.push(PropertyInfo {
                declaring_type: ty.clone(),
                property_type: resolve(&prop.ty, &prop.name)?,
                name: prop.name,
                is_static: prop.is_static,
                writable: prop.writable,
            });
        }

        let mut methods = Vec::with_capacity(decl.methods.len());
        for method in decl.methods {
            let params = method
                .params
                .iter()
                .map(|p| resolve(p, &method.name))
                .collect::<Result<Vec<_>, _>>()?;
            let return_type = match &method.returns {
                Some(name) => resolve(name, &method.name)?,
                None => HostType::Void,
            };
            methods.push(MethodInfo {
                declaring_type: ty.clone(),
                name: method.name,
                params,
                return_type,
                is_static: method.is_static,
                generic_arity: method.generic_arity,
            });
        }

        Ok(CatalogType {
            ty,
            base,
            fields,
            properties,
            methods,
        })
    }

    /// Every known type name, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find_type(name).is_some()
    }

    /// Entries searched for a member of `ty`: the type itself, then its base
    /// chain for instance members.
    fn lineage(&self, ty: &HostType, is_static: bool) -> Vec<&CatalogType> {
        let start = match ty {
            HostType::Array(_) => ARRAY_TYPE_NAME.to_string(),
            other => other.name(),
        };

        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(start);
        while let Some(name) = next.take() {
            if !seen.insert(name.clone()) {
                break;
            }
            let Some(entry) = self.types.get(&name) else {
                break;
            };
            chain.push(entry);
            if !is_static {
                next = entry.base.clone().or_else(|| implicit_base(&entry.ty));
            }
        }
        chain
    }

    fn find_member<'c, T>(
        &'c self,
        ty: &HostType,
        is_static: bool,
        members: impl Fn(&'c CatalogType) -> &'c [T],
        matches: impl Fn(&T) -> bool,
    ) -> Option<T>
    where
        T: Clone + 'c,
    {
        self.lineage(ty, is_static)
            .into_iter()
            .flat_map(|entry| members(entry).iter())
            .find(|member| matches(member))
            .cloned()
    }
}

/// Every type but `System.Object` and `System.Void` derives from
/// `System.Object`, declared or not.
fn implicit_base(ty: &HostType) -> Option<String> {
    match ty {
        HostType::Void => None,
        ty if ty.is_object() => None,
        _ => Some(OBJECT_TYPE_NAME.to_string()),
    }
}

impl TypeLookup for HostCatalog {
    fn find_type(&self, name: &str) -> Option<HostType> {
        if let Some(element) = name.strip_suffix(ARRAY_SUFFIX) {
            return self.find_type(element).map(HostType::array_of);
        }
        self.types.get(name).map(|entry| entry.ty.clone())
    }
}

impl MemberResolver for HostCatalog {
    fn find_field(&self, ty: &HostType, name: &str, is_static: bool) -> Option<FieldInfo> {
        self.find_member(
            ty,
            is_static,
            |entry| entry.fields.as_slice(),
            |f| f.name == name && f.is_static == is_static,
        )
    }

    fn find_property(&self, ty: &HostType, name: &str, is_static: bool) -> Option<PropertyInfo> {
        self.find_member(
            ty,
            is_static,
            |entry| entry.properties.as_slice(),
            |p| p.name == name && p.is_static == is_static,
        )
    }

    fn find_zero_arity_method(
        &self,
        ty: &HostType,
        name: &str,
        is_static: bool,
    ) -> Option<MethodInfo> {
        self.find_method(ty, name, 0, is_static)
    }

    fn find_method(
        &self,
        ty: &HostType,
        name: &str,
        arity: usize,
        is_static: bool,
    ) -> Option<MethodInfo> {
        self.find_member(
            ty,
            is_static,
            |entry| entry.methods.as_slice(),
            |m| m.name == name && m.is_static == is_static && m.arity() == arity,
        )
    }
}
