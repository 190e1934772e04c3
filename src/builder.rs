use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::vec::Vec;

use rulinalg::matrix::Matrix;
#[cfg(test)]
use rulinalg::matrix::BaseMatrix;
use rulinalg::vector::Vector;

use error::Error;
use interior;
use problem::StandardForm;

/// Linear combination of builder variables, keyed by variable handle.
/// Coefficients for a repeated handle accumulate.
#[derive(Debug, Clone)]
pub struct LinearExpr {
    terms: HashMap<usize, f64>,
}

impl LinearExpr {
    pub fn new() -> LinearExpr {
        LinearExpr {
            terms: HashMap::new(),
        }
    }

    fn accumulate(&mut self, var: usize, coeff: f64) {
        match self.terms.entry(var) {
            Entry::Occupied(ent) => {
                *ent.into_mut() += coeff;
            }
            Entry::Vacant(ent) => {
                ent.insert(coeff);
            }
        }
    }

    pub fn plus(mut self, var: usize, coeff: f64) -> LinearExpr {
        self.accumulate(var, coeff);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessEq,
    GreaterEq,
    Equal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Nonnegative,
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    Minimize,
    Maximize,
}

#[derive(Debug, Clone)]
struct Constraint {
    expr: LinearExpr,
    relation: Relation,
    rhs: f64,
}

/// How a builder variable appears in the solver's column space. Free
/// variables split into a difference of two nonnegative columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMapping {
    Single(usize),
    Split(usize, usize),
}

/// Incremental front end for assembling a model and handing it to the
/// interior path solver in equality standard form.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    goal: Goal,
    objective: LinearExpr,
    kinds: Vec<VarKind>,
    constraints: Vec<Constraint>,
}

impl ModelBuilder {
    pub fn minimize() -> ModelBuilder {
        ModelBuilder {
            goal: Goal::Minimize,
            objective: LinearExpr::new(),
            kinds: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn maximize() -> ModelBuilder {
        ModelBuilder {
            goal: Goal::Maximize,
            objective: LinearExpr::new(),
            kinds: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn variable(&mut self, kind: VarKind) -> usize {
        let handle = self.kinds.len();
        self.kinds.push(kind);
        handle
    }

    pub fn objective_term(&mut self, var: usize, coeff: f64) {
        self.objective.accumulate(var, coeff);
    }

    pub fn constrain(&mut self, expr: LinearExpr, relation: Relation, rhs: f64) {
        self.constraints.push(Constraint {
            expr: expr,
            relation: relation,
            rhs: rhs,
        });
    }

    /// Lowers the model to equality standard form: free variables split
    /// into column pairs, inequality rows gain a signed slack column
    /// (+1 for <=, -1 for >=), and a maximization objective is negated
    /// so the solver always minimizes.
    pub fn equality_form(&self) -> (StandardForm, Vec<ColumnMapping>) {
        let mut columns = 0;
        let mut mapping = Vec::with_capacity(self.kinds.len());
        for &kind in self.kinds.iter() {
            match kind {
                VarKind::Nonnegative => {
                    mapping.push(ColumnMapping::Single(columns));
                    columns += 1;
                }
                VarKind::Free => {
                    mapping.push(ColumnMapping::Split(columns, columns + 1));
                    columns += 2;
                }
            }
        }

        let mut slack_columns = Vec::with_capacity(self.constraints.len());
        for constraint in self.constraints.iter() {
            match constraint.relation {
                Relation::Equal => slack_columns.push(None),
                Relation::LessEq => {
                    slack_columns.push(Some((columns, 1.0)));
                    columns += 1;
                }
                Relation::GreaterEq => {
                    slack_columns.push(Some((columns, -1.0)));
                    columns += 1;
                }
            }
        }

        let mut a_data = Vec::with_capacity(self.constraints.len() * columns);
        let mut b_data = Vec::with_capacity(self.constraints.len());
        for (i, constraint) in self.constraints.iter().enumerate() {
            let mut row = vec![0.0; columns];
            for (&var, &coeff) in &constraint.expr.terms {
                match mapping[var] {
                    ColumnMapping::Single(col) => row[col] += coeff,
                    ColumnMapping::Split(pos, neg) => {
                        row[pos] += coeff;
                        row[neg] -= coeff;
                    }
                }
            }
            if let Some((col, sign)) = slack_columns[i] {
                row[col] = sign;
            }
            a_data.extend(row);
            b_data.push(constraint.rhs);
        }

        let orientation = match self.goal {
            Goal::Minimize => 1.0,
            Goal::Maximize => -1.0,
        };
        let mut c_data = vec![0.0; columns];
        for (&var, &coeff) in &self.objective.terms {
            match mapping[var] {
                ColumnMapping::Single(col) => c_data[col] += orientation * coeff,
                ColumnMapping::Split(pos, neg) => {
                    c_data[pos] += orientation * coeff;
                    c_data[neg] -= orientation * coeff;
                }
            }
        }

        let model = StandardForm {
            a: Matrix::new(self.constraints.len(), columns, a_data),
            b: Vector::new(b_data),
            c: Vector::new(c_data),
        };
        (model, mapping)
    }

    /// Solves the model and maps the solution back to builder variables.
    /// Returns the objective value in the builder's orientation together
    /// with one value per declared variable.
    pub fn solve(&self, alpha: f64) -> Result<(f64, Vec<f64>), Error> {
        let (model, mapping) = self.equality_form();
        let solution = interior::solve_equality(&model, alpha)?;

        let values = mapping
            .iter()
            .map(|&column| match column {
                ColumnMapping::Single(col) => solution.x[col],
                ColumnMapping::Split(pos, neg) => solution.x[pos] - solution.x[neg],
            })
            .collect();
        let objective = match self.goal {
            Goal::Minimize => solution.objective,
            Goal::Maximize => -solution.objective,
        };
        Ok((objective, values))
    }
}

#[test]
fn test_expr_accumulates_coefficients() {
    let expr = LinearExpr::new().plus(0, 1.0).plus(1, 2.0).plus(0, -3.0);
    assert_eq!(expr.terms.len(), 2);
    assert_eq!(expr.terms[&0], -2.0);
    assert_eq!(expr.terms[&1], 2.0);
}

#[test]
fn test_equality_form() {
    let mut builder = ModelBuilder::minimize();
    let u = builder.variable(VarKind::Nonnegative);
    let v = builder.variable(VarKind::Free);
    builder.objective_term(u, 2.0);
    builder.objective_term(v, -1.0);
    builder.constrain(
        LinearExpr::new().plus(u, 1.0).plus(v, 1.0),
        Relation::LessEq,
        4.0,
    );
    builder.constrain(
        LinearExpr::new().plus(u, 1.0).plus(v, -1.0),
        Relation::GreaterEq,
        1.0,
    );
    builder.constrain(
        LinearExpr::new().plus(u, 1.0).plus(v, 2.0),
        Relation::Equal,
        3.0,
    );

    let (model, mapping) = builder.equality_form();
    assert_eq!(model.a.rows(), 3);
    assert_eq!(model.a.cols(), 5);
    assert_eq!(
        model.a.data(),
        &vec![
            1.0, 1.0, -1.0, 1.0, 0.0,
            1.0, -1.0, 1.0, 0.0, -1.0,
            1.0, 2.0, -2.0, 0.0, 0.0,
        ]
    );
    assert_eq!(model.b.data(), &vec![4.0, 1.0, 3.0]);
    assert_eq!(model.c.data(), &vec![2.0, -1.0, 1.0, 0.0, 0.0]);
    assert_eq!(mapping[0], ColumnMapping::Single(0));
    assert_eq!(mapping[1], ColumnMapping::Split(1, 2));
}

#[test]
fn test_solve_production_model() {
    let mut builder = ModelBuilder::maximize();
    let x1 = builder.variable(VarKind::Nonnegative);
    let x2 = builder.variable(VarKind::Nonnegative);
    builder.objective_term(x1, 3.0);
    builder.objective_term(x2, 2.0);
    builder.constrain(
        LinearExpr::new().plus(x1, 1.0).plus(x2, 1.0),
        Relation::LessEq,
        9.0,
    );
    builder.constrain(
        LinearExpr::new().plus(x1, 3.0).plus(x2, 1.0),
        Relation::LessEq,
        18.0,
    );
    builder.constrain(LinearExpr::new().plus(x1, 1.0), Relation::LessEq, 7.0);
    builder.constrain(LinearExpr::new().plus(x2, 1.0), Relation::LessEq, 6.0);

    let (objective, values) = builder.solve(2.5).expect("Solve should not fail");

    assert!((objective - 22.5).abs() < 1e-2);
    assert!((values[0] - 4.5).abs() < 1e-2);
    assert!((values[1] - 4.5).abs() < 1e-2);
}

#[test]
fn test_solve_free_variable() {
    // Minimizing a free variable bounded below converges to the bound.
    let mut builder = ModelBuilder::minimize();
    let x = builder.variable(VarKind::Free);
    builder.objective_term(x, 1.0);
    builder.constrain(LinearExpr::new().plus(x, 1.0), Relation::GreaterEq, -5.0);

    let (objective, values) = builder.solve(10.0).expect("Solve should not fail");

    assert!((objective + 5.0).abs() < 1e-2);
    assert!((values[0] + 5.0).abs() < 1e-2);
}
