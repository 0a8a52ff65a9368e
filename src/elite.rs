//! Bounded pool of diverse high-revenue solutions used as relinking guides.

use rand::Rng;

use crate::path_relinking::distance;
use crate::solution::Solution;

/// Elite solutions, at most `capacity`, no two at distance zero.
#[derive(Debug, Clone)]
pub struct ElitePool {
    capacity: usize,
    members: Vec<Solution>,
}

impl ElitePool {
    pub fn new(capacity: usize) -> Self {
        ElitePool {
            capacity,
            members: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn members(&self) -> &[Solution] {
        &self.members
    }

    /// Offer a candidate. Returns whether it entered the pool.
    ///
    /// A candidate identical in assignment to a member is always rejected.
    /// Otherwise it is added while the pool has room, and once full it
    /// replaces the worst member if its revenue is higher.
    pub fn try_add(&mut self, candidate: &Solution) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self
            .members
            .iter()
            .any(|member| distance(member, candidate) == 0)
        {
            return false;
        }

        if self.members.len() < self.capacity {
            self.members.push(candidate.clone());
            return true;
        }

        let worst = self
            .members
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.revenue.total_cmp(&b.revenue))
            .map(|(index, member)| (index, member.revenue));
        match worst {
            Some((index, revenue)) if candidate.revenue > revenue => {
                self.members[index] = candidate.clone();
                true
            }
            _ => false,
        }
    }

    /// A uniformly chosen member.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<&Solution> {
        if self.members.is_empty() {
            return None;
        }
        Some(&self.members[rng.gen_range(0..self.members.len())])
    }

    pub fn best(&self) -> Option<&Solution> {
        self.members
            .iter()
            .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
    }
}
