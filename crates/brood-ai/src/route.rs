//! Patrol routes.

/// Ordered, cyclic list of patrol marker names.
///
/// Built once when an entity starts and never changed afterwards. Names are
/// sorted lexicographically so the patrol order does not depend on the order
/// in which markers happen to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointRoute {
    names: Vec<String>,
    wait_secs: f64,
    tolerance: f64,
}

impl WaypointRoute {
    /// Collect every marker name into a sorted route.
    pub fn discover<I, S>(markers: I, wait_secs: f64, tolerance: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = markers.into_iter().map(Into::into).collect();
        names.sort();
        Self {
            names,
            wait_secs,
            tolerance,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name of the waypoint at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Dwell time at each waypoint (seconds).
    pub fn wait_secs(&self) -> f64 {
        self.wait_secs
    }

    /// Arrival slack added to the agent stopping distance (meters).
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Index that follows `current`; the first call (no current) yields 0.
    pub fn next_index(&self, current: Option<usize>) -> Option<usize> {
        if self.names.is_empty() {
            return None;
        }
        Some(current.map_or(0, |i| (i + 1) % self.names.len()))
    }
}
