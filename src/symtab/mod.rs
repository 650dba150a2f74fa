// Copyright 2026 The NLP Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Hierarchical, scope-linked symbol table with forward-reference
//! reservation. Scopes form a tree: each table owns its child scopes, and
//! entries for class/function symbols may own a nested scope of their own.
//!
//! A table is per-parse state; the lexer populates it as a side effect of
//! scanning and the caller inspects it afterwards.

use std::collections::HashMap;

use crate::token::{Token, TokenKind};

/// Data type tag of a symbol.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SymDataType {
    #[default]
    Unknown,
    Integer,
    Real,
    Class,
}

/// One entry per user-defined symbol.
#[derive(Clone, Debug)]
pub struct SymTabEntry {
    /// First-occurrence token of the symbol.
    pub token: Token,
    pub data_type: SymDataType,
    pub declared: bool,
    /// True only between a forward lookup and its resolving declaration.
    pub reserved: bool,
    pub multiply_defined: bool,
    /// Every source position the symbol appears at, in order of sighting.
    pub locations: Vec<(u32, u32)>,
    /// Nested scope, for class and function symbols.
    pub scope: Option<Box<SymbolTable>>,
}

impl SymTabEntry {
    fn new(token: Token) -> Self {
        SymTabEntry {
            token,
            data_type: SymDataType::Unknown,
            declared: false,
            reserved: false,
            multiply_defined: false,
            locations: Vec::new(),
            scope: None,
        }
    }

    /// Placeholder for a forward reference; no occurrence exists yet.
    fn forward(id: &str) -> Self {
        let mut entry = SymTabEntry::new(Token::new(id.to_string(), 0, 0, TokenKind::Ident));
        entry.reserved = true;
        entry
    }

    fn add_location(&mut self, pos: (u32, u32)) {
        if !self.locations.contains(&pos) {
            self.locations.push(pos);
        }
    }
}

/// How to descend one level when walking the scope tree: through a child
/// scope, or through the nested scope of an entry.
#[derive(Clone, Debug)]
enum Hop {
    Scope(String),
    Entry(String),
}

#[derive(Clone, Debug)]
pub struct SymbolTable {
    name: String,
    entries: HashMap<String, SymTabEntry>,
    scopes: HashMap<String, SymbolTable>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new("_global_")
    }
}

impl SymbolTable {
    pub fn new(name: &str) -> Self {
        SymbolTable {
            name: name.to_string(),
            entries: HashMap::new(),
            scopes: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records a sighting of an identifier token. Idempotent per lexeme:
    /// the first sighting creates the entry, subsequent sightings append
    /// the occurrence position to the existing one.
    pub fn add_symbol(&mut self, token: &Token) {
        let pos = (token.line, token.column);
        match self.entries.get_mut(&token.lexeme) {
            Some(entry) => entry.add_location(pos),
            None => {
                let mut entry = SymTabEntry::new(token.clone());
                entry.add_location(pos);
                self.entries.insert(token.lexeme.clone(), entry);
            }
        }
    }

    /// Creates a child scope, guarding against a name collision with this
    /// scope or an already-registered child. A collision is resolved by
    /// appending a trailing `_` and reported, not fatal.
    pub fn create(&mut self, name: &str) -> &mut SymbolTable {
        let mut name = name.to_string();
        if name == self.name {
            log::warn!(
                "scope [{name}] has the same name as its parent; possibly a multiply-declared \
                 symbol in the source"
            );
            name.push('_');
        }
        while self.scopes.contains_key(&name) {
            log::warn!("scope [{name}] already registered, renaming to [{name}_]");
            name.push('_');
        }
        let child = SymbolTable::new(&name);
        self.scopes.entry(name).or_insert(child)
    }

    /// Direct lookup of a child scope by name.
    pub fn scope(&self, name: &str) -> Option<&SymbolTable> {
        self.scopes.get(name)
    }

    /// Direct lookup of an entry in this table only.
    pub fn entry(&self, lexeme: &str) -> Option<&SymTabEntry> {
        self.entries.get(lexeme)
    }

    pub fn entries(&self) -> &HashMap<String, SymTabEntry> {
        &self.entries
    }

    /// Looks up `id` starting at the scope named `scope` (falling back to
    /// this table if no such scope exists), recursing into nested scopes.
    /// With `reserve` set, a miss creates a placeholder entry flagged
    /// `reserved` in the searched scope instead of returning `None`,
    /// modeling a forward reference.
    pub fn search(&mut self, scope: &str, id: &str, reserve: bool) -> Option<&mut SymTabEntry> {
        let scope_path = self.locate_scope(scope).unwrap_or_default();
        let table = self.table_at_mut(&scope_path);

        let mut entry_path = Vec::new();
        let found = table.locate_entry(id, &mut entry_path);
        if !found {
            if !reserve {
                return None;
            }
            table.entries.insert(id.to_string(), SymTabEntry::forward(id));
            entry_path.clear();
        }

        let holder = table.table_at_mut(&entry_path);
        holder.entries.get_mut(id)
    }

    /// Resolves a previously reserved placeholder: clears the `reserved`
    /// flag, marks the entry declared, and returns it. `None` if no such
    /// reservation exists (the entry was already resolved, or is new).
    pub fn insert(&mut self, scope: &str, id: &str) -> Option<&mut SymTabEntry> {
        let entry = self.search(scope, id, true)?;
        if entry.reserved {
            entry.reserved = false;
            entry.declared = true;
            Some(entry)
        } else {
            None
        }
    }

    /// Marks a local entry as resolved/declared (or not) by lexeme.
    /// Returns whether an entry was found and updated.
    pub fn set_resolved(&mut self, lexeme: &str, resolved: bool) -> bool {
        match self.entries.get_mut(lexeme) {
            Some(entry) => {
                entry.declared = resolved;
                true
            }
            None => false,
        }
    }

    /// Tags a local entry with its data type.
    pub fn set_data_type(&mut self, lexeme: &str, data_type: SymDataType) -> bool {
        match self.entries.get_mut(lexeme) {
            Some(entry) => {
                entry.data_type = data_type;
                true
            }
            None => false,
        }
    }

    /// Flags a local entry as multiply defined.
    pub fn mark_multiply_defined(&mut self, lexeme: &str) -> bool {
        match self.entries.get_mut(lexeme) {
            Some(entry) => {
                entry.multiply_defined = true;
                true
            }
            None => false,
        }
    }

    /// Attaches a nested scope to the entry for `lexeme` (class/function
    /// symbols own the scope their members live in).
    pub fn attach_scope(&mut self, lexeme: &str, scope: SymbolTable) -> bool {
        match self.entries.get_mut(lexeme) {
            Some(entry) => {
                entry.scope = Some(Box::new(scope));
                true
            }
            None => false,
        }
    }

    /// Finds the path to the scope with the given name, this table
    /// included. An empty path means this table.
    fn locate_scope(&self, name: &str) -> Option<Vec<Hop>> {
        let mut path = Vec::new();
        if self.locate_scope_inner(name, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    fn locate_scope_inner(&self, name: &str, path: &mut Vec<Hop>) -> bool {
        if self.name == name {
            return true;
        }
        for (child_name, child) in &self.scopes {
            path.push(Hop::Scope(child_name.clone()));
            if child.locate_scope_inner(name, path) {
                return true;
            }
            path.pop();
        }
        for (lexeme, entry) in &self.entries {
            if let Some(ref nested) = entry.scope {
                path.push(Hop::Entry(lexeme.clone()));
                if nested.locate_scope_inner(name, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    /// Finds the path to the table holding an entry for `id`, local table
    /// first, then nested scopes. An empty path means this table.
    fn locate_entry(&self, id: &str, path: &mut Vec<Hop>) -> bool {
        if self.entries.contains_key(id) {
            return true;
        }
        for (child_name, child) in &self.scopes {
            path.push(Hop::Scope(child_name.clone()));
            if child.locate_entry(id, path) {
                return true;
            }
            path.pop();
        }
        for (lexeme, entry) in &self.entries {
            if let Some(ref nested) = entry.scope {
                path.push(Hop::Entry(lexeme.clone()));
                if nested.locate_entry(id, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    fn table_at_mut(&mut self, path: &[Hop]) -> &mut SymbolTable {
        let mut current = self;
        for hop in path {
            current = match hop {
                Hop::Scope(name) => current.scopes.get_mut(name).unwrap(),
                Hop::Entry(lexeme) => current
                    .entries
                    .get_mut(lexeme)
                    .and_then(|e| e.scope.as_deref_mut())
                    .unwrap(),
            };
        }
        current
    }
}
