use crate::problem::Problem;
use procure_core::models::{Deadline, Money, SearchStats};
use std::cmp::Reverse;
use tracing::{Level, event};

/// Which way the objective points.
///
/// The optimizer minimizes; the explainer reuses the same machinery to find
/// the most expensive feasible split when it needs a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Minimize,
    Maximize,
}

/// A complete, feasible assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    /// Landed cost
    pub cost: Money,
    /// Distinct suppliers used
    pub suppliers: usize,
    /// Supplier index per item, in shopping-list order
    pub assignment: Vec<usize>,
}

pub(crate) struct SearchOutcome {
    pub best: Option<Candidate>,
    /// False if the deadline cut the search short
    pub exhausted: bool,
    pub stats: SearchStats,
}

/// Depth-first branch-and-bound over line → supplier assignments.
///
/// Lines are decided one at a time, most constrained first. The incremental
/// state (`used`, `subtotal`, `potential`, ...) always describes the current
/// partial assignment and is restored on the way back up.
pub(crate) struct Search<'a> {
    problem: &'a Problem,
    direction: Direction,
    deadline: &'a Deadline,
    check_interval: u64,
    /// Nodes to visit before giving up as if the deadline had passed
    node_limit: u64,

    /// Items in decision order
    order: Vec<usize>,
    /// `tail[d]`: sum over undecided items (from depth `d`) of their best-case line cost
    tail: Vec<Money>,

    assignment: Vec<usize>,
    /// Lines assigned per supplier
    used: Vec<usize>,
    /// Lines with more than one option assigned per supplier
    flexible: Vec<usize>,
    subtotal: Vec<Money>,
    /// Cost of the undecided lines each supplier could still take
    potential: Vec<Money>,
    /// Number of undecided lines each supplier could still take
    reach: Vec<usize>,
    committed: Money,
    opened: usize,

    best: Option<Candidate>,
    stats: SearchStats,
    expired: bool,
    /// Per-depth scratch space for ordering branches
    branches: Vec<Vec<(Money, usize, Money)>>,
}

impl<'a> Search<'a> {
    pub fn new(
        problem: &'a Problem,
        direction: Direction,
        deadline: &'a Deadline,
        check_interval: u64,
    ) -> Self {
        let n = problem.items.len();
        let m = problem.suppliers.len();

        // Fewest options first, then the lines that weigh the most.
        let mut order = (0..n).collect::<Vec<_>>();
        order.sort_by_key(|&i| {
            let item = &problem.items[i];
            (item.options.len(), Reverse(item.dearest()), i)
        });

        let mut tail = vec![Money::ZERO; n + 1];
        for depth in (0..n).rev() {
            let item = &problem.items[order[depth]];
            let best_case = match direction {
                Direction::Minimize => item.cheapest(),
                Direction::Maximize => item.dearest(),
            };
            tail[depth] = tail[depth + 1] + best_case;
        }

        let mut potential = vec![Money::ZERO; m];
        let mut reach = vec![0; m];
        for choice in problem.items.iter().flat_map(|item| item.options.iter()) {
            potential[choice.supplier] += choice.cost;
            reach[choice.supplier] += 1;
        }

        Self {
            problem,
            direction,
            deadline,
            check_interval: check_interval.max(1),
            node_limit: u64::MAX,
            order,
            tail,
            assignment: vec![0; n],
            used: vec![0; m],
            flexible: vec![0; m],
            subtotal: vec![Money::ZERO; m],
            potential,
            reach,
            committed: Money::ZERO,
            opened: 0,
            best: None,
            stats: SearchStats::default(),
            expired: false,
            branches: vec![Vec::new(); n],
        }
    }

    pub fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.node_limit = node_limit;
        self
    }

    /// Offer a complete assignment found outside the search as the incumbent
    pub fn seed(&mut self, assignment: Vec<usize>) {
        self.stats.leaves += 1;
        if let Some((cost, suppliers)) = self.problem.evaluate(&assignment) {
            self.offer(Candidate {
                cost,
                suppliers,
                assignment,
            });
        }
    }

    pub fn run(mut self) -> SearchOutcome {
        self.descend(0);
        event!(
            Level::DEBUG,
            direction = ?self.direction,
            nodes = self.stats.nodes,
            pruned = self.stats.pruned,
            leaves = self.stats.leaves,
            expired = self.expired,
            "search finished"
        );
        SearchOutcome {
            best: self.best,
            exhausted: !self.expired,
            stats: self.stats,
        }
    }

    fn descend(&mut self, depth: usize) {
        self.stats.nodes += 1;
        let check_clock = (self.stats.nodes - 1) % self.check_interval == 0;
        if self.stats.nodes > self.node_limit
            || self.deadline.is_cancelled()
            || (check_clock && self.deadline.is_expired())
        {
            self.expired = true;
            return;
        }

        if depth == self.order.len() {
            self.leaf();
            return;
        }

        if self.bounded_out(depth) {
            self.stats.pruned += 1;
            return;
        }

        let problem = self.problem;
        let index = self.order[depth];
        let item = &problem.items[index];

        let mut branches = std::mem::take(&mut self.branches[depth]);
        branches.clear();
        for choice in item.options.iter() {
            let opening = if self.used[choice.supplier] == 0 {
                problem.suppliers[choice.supplier].terms.shipping
            } else {
                Money::ZERO
            };
            branches.push((choice.cost + opening, choice.supplier, choice.cost));
        }
        match self.direction {
            Direction::Minimize => branches.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1))),
            Direction::Maximize => branches.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1))),
        }

        for &(_, supplier, cost) in branches.iter() {
            self.assign(index, supplier, cost);
            if self.short_of_minimum(index) {
                self.stats.pruned += 1;
            } else {
                self.descend(depth + 1);
            }
            self.unassign(index, supplier, cost);
            if self.expired {
                break;
            }
        }

        self.branches[depth] = branches;
    }

    fn assign(&mut self, index: usize, supplier: usize, cost: Money) {
        let problem = self.problem;
        let item = &problem.items[index];

        if self.used[supplier] == 0 {
            self.committed += problem.suppliers[supplier].terms.shipping;
            self.opened += 1;
        }
        self.used[supplier] += 1;
        if !item.is_sole_sourced() {
            self.flexible[supplier] += 1;
        }
        self.subtotal[supplier] += cost;
        self.committed += cost;

        for choice in item.options.iter() {
            self.potential[choice.supplier] -= choice.cost;
            self.reach[choice.supplier] -= 1;
        }
        self.assignment[index] = supplier;
    }

    fn unassign(&mut self, index: usize, supplier: usize, cost: Money) {
        let problem = self.problem;
        let item = &problem.items[index];

        for choice in item.options.iter() {
            self.potential[choice.supplier] += choice.cost;
            self.reach[choice.supplier] += 1;
        }

        self.committed -= cost;
        self.subtotal[supplier] -= cost;
        if !item.is_sole_sourced() {
            self.flexible[supplier] -= 1;
        }
        self.used[supplier] -= 1;
        if self.used[supplier] == 0 {
            self.committed -= problem.suppliers[supplier].terms.shipping;
            self.opened -= 1;
        }
    }

    /// Deciding `index` may have taken the last chance some opened supplier
    /// had to reach its minimum order.
    fn short_of_minimum(&self, index: usize) -> bool {
        let problem = self.problem;
        problem.items[index].options.iter().any(|choice| {
            let supplier = choice.supplier;
            self.used[supplier] > 0
                && self.subtotal[supplier] + self.potential[supplier]
                    < problem.suppliers[supplier].terms.min_order
                && !problem.exempts(self.flexible[supplier])
        })
    }

    fn bounded_out(&self, depth: usize) -> bool {
        let Some(best) = &self.best else {
            return false;
        };
        match self.direction {
            Direction::Minimize => {
                let bound = self.committed + self.tail[depth] + self.opening_floor(depth);
                bound > best.cost || (bound == best.cost && self.opened > best.suppliers)
            }
            Direction::Maximize => {
                let bound = self.committed + self.tail[depth] + self.opening_ceiling();
                bound <= best.cost
            }
        }
    }

    /// Shipping that must still be paid: every undecided line whose suppliers
    /// are all unopened forces at least one more supplier to open.
    fn opening_floor(&self, depth: usize) -> Money {
        let problem = self.problem;
        self.order[depth..]
            .iter()
            .map(|&index| &problem.items[index])
            .filter(|item| {
                item.options
                    .iter()
                    .all(|choice| self.used[choice.supplier] == 0)
            })
            .map(|item| {
                item.options
                    .iter()
                    .map(|choice| problem.suppliers[choice.supplier].terms.shipping)
                    .min()
                    .unwrap_or_default()
            })
            .max()
            .unwrap_or_default()
    }

    /// Shipping that could still be paid: every unopened supplier that some
    /// undecided line could go to.
    fn opening_ceiling(&self) -> Money {
        (0..self.problem.suppliers.len())
            .filter(|&supplier| self.used[supplier] == 0 && self.reach[supplier] > 0)
            .map(|supplier| self.problem.suppliers[supplier].terms.shipping)
            .sum()
    }

    fn leaf(&mut self) {
        self.stats.leaves += 1;

        if let Some(best) = &self.best {
            let hopeless = match self.direction {
                Direction::Minimize => {
                    self.committed > best.cost
                        || (self.committed == best.cost && self.opened > best.suppliers)
                }
                Direction::Maximize => self.committed <= best.cost,
            };
            if hopeless {
                return;
            }
        }

        // The running totals steer the search; feasibility and cost of a
        // complete assignment are always re-derived by the bundle evaluator.
        let assignment = self.assignment.clone();
        if let Some((cost, suppliers)) = self.problem.evaluate(&assignment) {
            debug_assert_eq!(cost, self.committed);
            self.offer(Candidate {
                cost,
                suppliers,
                assignment,
            });
        }
    }

    fn offer(&mut self, candidate: Candidate) {
        let improves = match &self.best {
            None => true,
            Some(best) => match self.direction {
                Direction::Minimize => {
                    (candidate.cost, candidate.suppliers, &candidate.assignment)
                        < (best.cost, best.suppliers, &best.assignment)
                }
                Direction::Maximize => candidate.cost > best.cost,
            },
        };
        if improves {
            self.stats.improvements += 1;
            self.best = Some(candidate);
        }
    }
}
