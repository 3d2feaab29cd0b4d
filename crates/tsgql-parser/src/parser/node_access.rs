//! Typed accessors over NodeArena nodes.

use super::base::NodeIndex;
use super::node::{NodeArena, NodeData, modifier_flags};

impl NodeArena {
    /// Text of an Identifier node.
    pub fn get_identifier_text(&self, idx: NodeIndex) -> Option<&str> {
        match self.get_data(idx)? {
            NodeData::Identifier(ident) => Some(&ident.escaped_text),
            _ => None,
        }
    }

    /// Text of a property or enum member name: identifier, string or
    /// numeric literal (quotes already removed).
    pub fn get_property_name_text(&self, idx: NodeIndex) -> Option<&str> {
        match self.get_data(idx)? {
            NodeData::Identifier(ident) => Some(&ident.escaped_text),
            NodeData::StringLiteral(lit) | NodeData::NumericLiteral(lit) => Some(&lit.text),
            _ => None,
        }
    }

    /// Dotted text of an entity name (`A.B.C`).
    pub fn get_entity_name_text(&self, idx: NodeIndex) -> Option<String> {
        match self.get_data(idx)? {
            NodeData::Identifier(ident) => Some(ident.escaped_text.clone()),
            NodeData::QualifiedName(qn) => Some(format!(
                "{}.{}",
                self.get_entity_name_text(qn.left)?,
                self.get_identifier_text(qn.right)?
            )),
            _ => None,
        }
    }

    /// Identifiers of an entity name, leftmost first.
    pub fn get_entity_name_parts(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        match self.get_data(idx) {
            Some(NodeData::QualifiedName(qn)) => {
                let mut parts = self.get_entity_name_parts(qn.left);
                parts.push(qn.right);
                parts
            }
            Some(NodeData::Identifier(_)) => vec![idx],
            _ => Vec::new(),
        }
    }

    /// The name node of a named declaration.
    pub fn get_declaration_name(&self, idx: NodeIndex) -> NodeIndex {
        match self.get_data(idx) {
            Some(NodeData::InterfaceDeclaration(d)) => d.name,
            Some(NodeData::TypeAliasDeclaration(d)) => d.name,
            Some(NodeData::EnumDeclaration(d)) => d.name,
            Some(NodeData::ModuleDeclaration(d)) => d.name,
            Some(NodeData::ClassDeclaration(d)) => d.name,
            Some(NodeData::FunctionDeclaration(d)) => d.name,
            Some(NodeData::VariableDeclaration(d)) => d.name,
            Some(NodeData::PropertySignature(d)) => d.name,
            Some(NodeData::MethodSignature(d)) => d.name,
            Some(NodeData::EnumMember(d)) => d.name,
            Some(NodeData::Parameter(d)) => d.name,
            Some(NodeData::TypeParameter(d)) => d.name,
            Some(NodeData::ImportSpecifier(d)) | Some(NodeData::ExportSpecifier(d)) => d.name,
            _ => NodeIndex::NONE,
        }
    }

    /// Modifier bits of a declaration statement.
    pub fn get_modifiers(&self, idx: NodeIndex) -> u32 {
        match self.get_data(idx) {
            Some(NodeData::InterfaceDeclaration(d)) => d.modifiers,
            Some(NodeData::TypeAliasDeclaration(d)) => d.modifiers,
            Some(NodeData::EnumDeclaration(d)) => d.modifiers,
            Some(NodeData::ModuleDeclaration(d)) => d.modifiers,
            Some(NodeData::ClassDeclaration(d)) => d.modifiers,
            Some(NodeData::FunctionDeclaration(d)) => d.modifiers,
            Some(NodeData::VariableStatement(d)) => d.modifiers,
            Some(NodeData::ImportDeclaration(d)) => d.modifiers,
            Some(NodeData::ExportDeclaration(d)) => d.modifiers,
            _ => modifier_flags::NONE,
        }
    }

    pub fn has_modifier(&self, idx: NodeIndex, flag: u32) -> bool {
        self.get_modifiers(idx) & flag != 0
    }

    /// The type parameters declared directly on a node.
    pub fn get_type_parameters(&self, idx: NodeIndex) -> &[NodeIndex] {
        match self.get_data(idx) {
            Some(NodeData::InterfaceDeclaration(d)) => &d.type_parameters.nodes,
            Some(NodeData::TypeAliasDeclaration(d)) => &d.type_parameters.nodes,
            Some(NodeData::ClassDeclaration(d)) => &d.type_parameters.nodes,
            Some(NodeData::FunctionDeclaration(d)) => &d.type_parameters.nodes,
            Some(NodeData::MethodSignature(d)) => &d.type_parameters.nodes,
            Some(NodeData::FunctionType(d)) => &d.type_parameters.nodes,
            Some(NodeData::IndexSignature(d))
            | Some(NodeData::CallSignature(d))
            | Some(NodeData::ConstructSignature(d)) => &d.type_parameters.nodes,
            _ => &[],
        }
    }

    /// The source text covered by a node.
    pub fn get_node_text<'a>(&self, idx: NodeIndex, source: &'a str) -> &'a str {
        self.get(idx)
            .and_then(|node| source.get(node.pos as usize..node.end as usize))
            .unwrap_or("")
    }
}
