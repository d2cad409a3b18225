//! Type formatting for diagnostics and printed expressions.

use crate::intern::TypeInterner;
use crate::types::{TypeData, TypeId};
use std::fmt::{self, Write};

/// Renders types in source syntax: `int?`, `Order[]`, `List<Customer>`.
pub struct TypeFormatter<'a> {
    db: &'a TypeInterner,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a TypeInterner) -> Self {
        Self { db }
    }

    pub fn format(&self, ty: TypeId) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_type(&mut out, ty);
        out
    }

    /// A `Display` adapter, handy for `tracing` fields (`ty = %fmt.display(id)`).
    pub fn display(&self, ty: TypeId) -> TypeDisplay<'a> {
        TypeDisplay { db: self.db, ty }
    }

    fn write_type(&self, out: &mut impl Write, ty: TypeId) -> fmt::Result {
        if ty.is_none() {
            return out.write_str("<none>");
        }
        match self.db.lookup(ty) {
            Some(TypeData::Intrinsic(kind)) => out.write_str(kind.name()),
            Some(TypeData::Nullable(inner)) => {
                self.write_type(out, inner)?;
                out.write_char('?')
            }
            Some(TypeData::Array(element)) => {
                self.write_type(out, element)?;
                out.write_str("[]")
            }
            Some(TypeData::Named(named)) => {
                let name = self.db.definitions().get_name(named.def);
                out.write_str(name.as_deref().unwrap_or("<unknown>"))?;
                if !named.args.is_empty() {
                    out.write_char('<')?;
                    for (i, &arg) in named.args.iter().enumerate() {
                        if i > 0 {
                            out.write_str(", ")?;
                        }
                        self.write_type(out, arg)?;
                    }
                    out.write_char('>')?;
                }
                Ok(())
            }
            Some(TypeData::TypeParam(index)) => write!(out, "T{index}"),
            None => write!(out, "<type#{}>", ty.0),
        }
    }
}

pub struct TypeDisplay<'a> {
    db: &'a TypeInterner,
    ty: TypeId,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TypeFormatter::new(self.db).write_type(f, self.ty)
    }
}
