use super::{Id, PollError, PollResult, Timestamp};

/// Results of one polling run, kept in arrival order.
#[derive(Debug, Clone)]
pub struct Batch<C> {
    pub id: Id,
    pub submitted: usize,
    pub started: Timestamp,
    pub finished: Timestamp,
    pub results: Vec<PollResult<C>>,
}
impl<C> Batch<C> {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// One result per submitted host, each position exactly once.
    pub fn is_complete(&self) -> bool {
        if self.results.len() != self.submitted {
            return false;
        }
        let mut seen = vec![false; self.submitted];
        for result in self.results.iter() {
            match seen.get_mut(result.index) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    /// Results sorted by submission position.
    pub fn ordered(&self) -> Vec<&PollResult<C>> {
        let mut results: Vec<_> = self.results.iter().collect();
        results.sort_by_key(|x| x.index);
        results
    }

    pub fn into_ordered(mut self) -> Vec<PollResult<C>> {
        self.results.sort_by_key(|x| x.index);
        self.results
    }

    pub fn successes(&self) -> impl Iterator<Item = (&C, &str)> {
        self.results
            .iter()
            .filter_map(|x| x.data().map(|data| (&x.context, data)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&PollResult<C>, &PollError)> {
        self.results
            .iter()
            .filter_map(|x| x.error().map(|e| (x, e)))
    }
}
