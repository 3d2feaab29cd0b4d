//! The embedded default library.
//!
//! Declares the handful of globals schema sources lean on (`Date`,
//! `Array<T>`, `ReadonlyArray<T>`). It is bound as a script so its
//! declarations land in the global table.

/// An embedded declaration file.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedLib {
    pub file_name: &'static str,
    pub content: &'static str,
}

pub const DEFAULT_LIB: EmbeddedLib = EmbeddedLib {
    file_name: "lib.d.ts",
    content: include_str!("../lib/lib.d.ts"),
};
