use std::fmt::Write;

use crate::semantic::{DeclNode, LowerOutput, TypeDescriptor};

/// Renders resolved declarations as an indented tree.
pub struct DeclDumper {
    indent: String,
    out: String,
}

impl Default for DeclDumper {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclDumper {
    pub fn new() -> Self {
        Self {
            indent: String::new(),
            out: String::new(),
        }
    }

    /// Dump a declaration list.
    pub fn dump(mut self, declarations: &[DeclNode]) -> String {
        self.dump_declarations(declarations);
        self.out
    }

    /// Dump the declarations followed by the tag table, if any.
    pub fn dump_output(mut self, output: &LowerOutput) -> String {
        self.dump_declarations(&output.declarations);
        if !output.tags.is_empty() {
            writeln!(self.out, "Tags").unwrap();
            let mut tags_iter = output.tags.values().peekable();
            while let Some(aggregate) = tags_iter.next() {
                let is_last = tags_iter.peek().is_none();
                let prefix = if is_last { "└─ " } else { "├─ " };
                let child_indent = if is_last { "   " } else { "│  " };

                writeln!(self.out, "{}{}{}", self.indent, prefix, aggregate).unwrap();
                self.indent.push_str(child_indent);
                self.dump_children("Field", &aggregate.members);
                self.indent.truncate(self.indent.len() - child_indent.len());
            }
        }
        self.out
    }

    fn dump_declarations(&mut self, declarations: &[DeclNode]) {
        writeln!(self.out, "Declarations").unwrap();
        let mut decls_iter = declarations.iter().peekable();
        while let Some(node) = decls_iter.next() {
            let is_last = decls_iter.peek().is_none();
            let label = if node.is_typedef() {
                "Typedef"
            } else if node.is_function() {
                "Function"
            } else {
                "Var"
            };
            self.dump_node(label, node, is_last);
        }
    }

    fn dump_node(&mut self, label: &str, node: &DeclNode, is_last: bool) {
        let prefix = if is_last { "└─ " } else { "├─ " };
        let child_indent = if is_last { "   " } else { "│  " };

        let name = if node.name.is_empty() { "<unnamed>" } else { node.name.as_str() };
        write!(self.out, "{}{}{} '{}' '{}'", self.indent, prefix, label, name, node.type_string()).unwrap();
        if let Some(storage) = node.storage
            && label != "Typedef"
        {
            write!(self.out, " {}", storage.as_str()).unwrap();
        }
        if let Some(expression) = &node.expression {
            write!(self.out, " = {}", expression).unwrap();
        }
        if let Some(value) = &node.value {
            write!(self.out, " => {}", value).unwrap();
        }
        writeln!(self.out).unwrap();

        self.indent.push_str(child_indent);
        match &node.ty {
            TypeDescriptor::Function(function) => self.dump_children("Param", &function.params),
            TypeDescriptor::Aggregate(aggregate) => self.dump_children("Field", &aggregate.members),
            TypeDescriptor::Scalar(_) => {}
        }
        self.indent.truncate(self.indent.len() - child_indent.len());
    }

    fn dump_children(&mut self, label: &str, nodes: &[DeclNode]) {
        let mut iter = nodes.iter().peekable();
        while let Some(node) = iter.next() {
            let is_last = iter.peek().is_none();
            self.dump_node(label, node, is_last);
        }
    }
}
