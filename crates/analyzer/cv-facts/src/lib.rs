//! Graph facts about a program
//!
//! Turns a program into flat entity and relationship records for an external
//! graph index. Facts are derived from the syntax tree and are meant to be
//! computed only after the program lowered successfully, so every name use
//! refers to a declared variable.
//!
//! Variable ids are `function::name`; shadowed declarations of the same name
//! in one function share an id.

pub mod store;

pub use store::{FactStore, InMemoryStore};

use cv_syntax::{Block, Expr, FunctionDecl, Item, Program, Stmt};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A function definition
    Function,
    /// A parameter or local variable
    Variable,
}

/// Relationship kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipKind {
    /// Function declares a variable
    Declares,
    /// Function reads or writes a variable
    Uses,
}

/// A graph node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Identity used for merging
    pub id: String,
    /// What the entity is
    pub kind: EntityKind,
    /// Source name
    pub name: String,
    /// Extra properties, in insertion order
    pub attributes: IndexMap<String, String>,
}

/// A directed graph edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    /// Source entity id
    pub from: String,
    /// Target entity id
    pub to: String,
    /// Edge kind
    pub relationship: RelationshipKind,
}

/// Deduplicated facts, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactSet {
    /// Nodes
    pub entities: Vec<Entity>,
    /// Edges
    pub relationships: Vec<Relationship>,
}

impl FactSet {
    /// Entity by id
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }
}

/// Extracts the facts of every function in `program`
pub fn extract(program: &Program) -> FactSet {
    let mut collector = Collector::default();
    for item in &program.items {
        if let Item::Function(decl) = item {
            collector.function(decl);
        }
    }

    let facts = FactSet {
        entities: collector.entities.into_values().collect(),
        relationships: collector.relationships.into_iter().collect(),
    };
    debug!(
        entities = facts.entities.len(),
        relationships = facts.relationships.len(),
        "extracted facts"
    );
    facts
}

#[derive(Default)]
struct Collector {
    entities: IndexMap<String, Entity>,
    relationships: IndexSet<Relationship>,
}

impl Collector {
    fn function(&mut self, decl: &FunctionDecl) {
        let id = decl.name.clone();
        self.entities.entry(id.clone()).or_insert_with(|| Entity {
            id: id.clone(),
            kind: EntityKind::Function,
            name: decl.name.clone(),
            attributes: IndexMap::from([
                ("return_type".to_string(), decl.return_type.name.clone()),
                ("params".to_string(), decl.params.len().to_string()),
            ]),
        });

        for param in &decl.params {
            self.declare(&id, &param.name, &param.ty.name, "parameter");
        }
        self.block(&id, &decl.body);
    }

    fn declare(&mut self, function: &str, name: &str, ty: &str, role: &str) {
        let id = variable_id(function, name);
        self.entities.entry(id.clone()).or_insert_with(|| Entity {
            id: id.clone(),
            kind: EntityKind::Variable,
            name: name.to_string(),
            attributes: IndexMap::from([
                ("type".to_string(), ty.to_string()),
                ("role".to_string(), role.to_string()),
                ("function".to_string(), function.to_string()),
            ]),
        });
        self.relate(function, id, RelationshipKind::Declares);
    }

    fn relate(&mut self, function: &str, variable: String, relationship: RelationshipKind) {
        self.relationships.insert(Relationship {
            from: function.to_string(),
            to: variable,
            relationship,
        });
    }

    fn block(&mut self, function: &str, block: &Block) {
        for stmt in &block.stmts {
            self.stmt(function, stmt);
        }
    }

    fn stmt(&mut self, function: &str, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl { name, ty, init, .. } => {
                if let Some(init) = init {
                    self.expr(function, init);
                }
                self.declare(function, name, &ty.name, "local");
            }
            Stmt::Assign { target, value, .. } => {
                self.expr(function, value);
                self.relate(function, variable_id(function, target), RelationshipKind::Uses);
            }
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.expr(function, value);
                }
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.expr(function, condition);
                self.block(function, then_branch);
                if let Some(else_branch) = else_branch {
                    self.block(function, else_branch);
                }
            }
            Stmt::While { condition, body, .. } => {
                self.expr(function, condition);
                self.block(function, body);
            }
            Stmt::For {
                init,
                condition,
                step,
                body,
                ..
            } => {
                if let Some(init) = init {
                    self.stmt(function, init);
                }
                if let Some(condition) = condition {
                    self.expr(function, condition);
                }
                self.block(function, body);
                if let Some(step) = step {
                    self.stmt(function, step);
                }
            }
            Stmt::Break { .. } | Stmt::Continue { .. } => {}
            Stmt::Block(block) => self.block(function, block),
            Stmt::Expr { expr, .. } => self.expr(function, expr),
        }
    }

    fn expr(&mut self, function: &str, expr: &Expr) {
        match expr {
            Expr::Int { .. } => {}
            Expr::Variable { name, .. } => {
                self.relate(function, variable_id(function, name), RelationshipKind::Uses);
            }
            Expr::Binary { lhs, rhs, .. } => {
                self.expr(function, lhs);
                self.expr(function, rhs);
            }
            Expr::Unary { operand, .. } => self.expr(function, operand),
            Expr::Call { args, .. } => {
                for arg in args {
                    self.expr(function, arg);
                }
            }
        }
    }
}

fn variable_id(function: &str, name: &str) -> String {
    format!("{function}::{name}")
}
