//! Back-substitution: distribute the solved current down the merge tree.

use crate::circuit::Circuit;
use crate::connection::Connection;
use crate::ElementId;

impl Circuit {
    /// Walk the merge tree rooted at `root`, which carries `current`.
    ///
    /// Leaves are restored to the active network with their current (and
    /// Ohm's-law voltage for non-sources); merge-tree elements are detached
    /// once their children have been scheduled.
    ///
    /// Returns each leaf's flow from its `node1` to its `node2`: the share of
    /// `current` it carries, negated when the leaf runs against the root.
    pub(crate) fn back_substitute(&mut self, root: ElementId, current: f64) -> Vec<(ElementId, f64)> {
        let mut flows = Vec::new();
        let mut stack = vec![(root, current, true)];

        while let Some((id, current, aligned)) = stack.pop() {
            self.el_mut(id).set_current(current);

            let Some(record) = self.el(id).merge_record().copied() else {
                if !self.active().contains(&id) {
                    self.activate(id);
                    self.attach(id);
                }
                if !self.is_source(id) {
                    let voltage = current * self.el(id).resistance();
                    self.el_mut(id).set_solved_voltage(voltage);
                }
                flows.push((id, if aligned { current } else { -current }));
                continue;
            };

            let (left_current, right_current) = match record.kind {
                Connection::Parallel => self.divide_current(record.left, record.right, current),
                _ => (current, current),
            };

            self.detach(id);
            self.deactivate(id);
            stack.push((record.right, right_current, aligned != record.right_reversed));
            stack.push((record.left, left_current, aligned));
        }
        flows
    }

    /// Current divider between two parallel branches.
    ///
    /// A shorted branch takes everything.
    fn divide_current(&self, left: ElementId, right: ElementId, current: f64) -> (f64, f64) {
        let tol = self.tolerances();
        let r_left = self.el(left).resistance();
        let r_right = self.el(right).resistance();

        if tol.is_short(r_left) {
            (current, 0.0)
        } else if tol.is_short(r_right) {
            (0.0, current)
        } else {
            let ratio = r_left / r_right;
            (current / (ratio + 1.0), ratio * current / (ratio + 1.0))
        }
    }
}
