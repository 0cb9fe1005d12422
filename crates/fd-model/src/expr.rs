//! Arena expression tree for residual equations.
//!
//! Equations are pure expressions over named variable slots. The arena is
//! append-only: expressions are built once at descriptor assembly and never
//! mutated afterwards. Handles are plain indices into the arena, so cloning
//! an expression list is cheap and evaluation needs no graph traversal state.

use fd_core::{FdError, FdResult, Real};

/// Handle to a node in an [`ExprArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExprId(usize);

impl ExprId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Named variable slot an expression can read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Differential state component.
    State(usize),
    /// Time derivative of a differential state component.
    StateDot(usize),
    /// Control input component.
    Control(usize),
    /// Algebraic variable component.
    Algebraic(usize),
    /// Exogenous parameter component.
    Param(usize),
}

#[derive(Clone, Copy, Debug)]
enum Node {
    Const(Real),
    Var(Slot),
    Add(ExprId, ExprId),
    Sub(ExprId, ExprId),
    Mul(ExprId, ExprId),
    Neg(ExprId),
    Square(ExprId),
    Exp(ExprId),
    Atan(ExprId),
}

/// Values bound to variable slots for one evaluation.
#[derive(Clone, Copy, Debug)]
pub struct Bindings<'a> {
    pub state: &'a [Real],
    pub state_dot: &'a [Real],
    pub control: &'a [Real],
    pub algebraic: &'a [Real],
    pub param: &'a [Real],
}

impl Bindings<'_> {
    fn resolve(&self, slot: Slot) -> FdResult<Real> {
        let (values, idx, what) = match slot {
            Slot::State(i) => (self.state, i, "state slot"),
            Slot::StateDot(i) => (self.state_dot, i, "state-dot slot"),
            Slot::Control(i) => (self.control, i, "control slot"),
            Slot::Algebraic(i) => (self.algebraic, i, "algebraic slot"),
            Slot::Param(i) => (self.param, i, "parameter slot"),
        };
        values.get(idx).copied().ok_or(FdError::IndexOob {
            what,
            index: idx,
            len: values.len(),
        })
    }
}

/// Append-only arena of expression nodes.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    nodes: Vec<Node>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Node) -> ExprId {
        let id = ExprId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn constant(&mut self, value: Real) -> ExprId {
        self.push(Node::Const(value))
    }

    pub fn var(&mut self, slot: Slot) -> ExprId {
        self.push(Node::Var(slot))
    }

    pub fn add(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.push(Node::Add(a, b))
    }

    pub fn sub(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.push(Node::Sub(a, b))
    }

    pub fn mul(&mut self, a: ExprId, b: ExprId) -> ExprId {
        self.push(Node::Mul(a, b))
    }

    pub fn neg(&mut self, a: ExprId) -> ExprId {
        self.push(Node::Neg(a))
    }

    pub fn square(&mut self, a: ExprId) -> ExprId {
        self.push(Node::Square(a))
    }

    pub fn exp(&mut self, a: ExprId) -> ExprId {
        self.push(Node::Exp(a))
    }

    pub fn atan(&mut self, a: ExprId) -> ExprId {
        self.push(Node::Atan(a))
    }

    /// Scale an expression by a constant coefficient.
    pub fn scale(&mut self, a: ExprId, coeff: Real) -> ExprId {
        let c = self.constant(coeff);
        self.mul(a, c)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Evaluate the expression rooted at `id` against the given bindings.
    pub fn eval(&self, id: ExprId, bindings: &Bindings) -> FdResult<Real> {
        let node = *self.nodes.get(id.0).ok_or(FdError::IndexOob {
            what: "expression id",
            index: id.0,
            len: self.nodes.len(),
        })?;
        let v = match node {
            Node::Const(c) => c,
            Node::Var(slot) => bindings.resolve(slot)?,
            Node::Add(a, b) => self.eval(a, bindings)? + self.eval(b, bindings)?,
            Node::Sub(a, b) => self.eval(a, bindings)? - self.eval(b, bindings)?,
            Node::Mul(a, b) => self.eval(a, bindings)? * self.eval(b, bindings)?,
            Node::Neg(a) => -self.eval(a, bindings)?,
            Node::Square(a) => {
                let x = self.eval(a, bindings)?;
                x * x
            }
            Node::Exp(a) => self.eval(a, bindings)?.exp(),
            Node::Atan(a) => self.eval(a, bindings)?.atan(),
        };
        Ok(v)
    }
}
