use crate::{
    collision::{check_soft_bodies, resolve_soft_contact, SoftContact},
    common::{PhysicsError, WorldConfig},
    integration::integrator,
    objects::SoftBody,
};

/// Owns a set of soft bodies and runs the per-tick pipeline over them:
/// integrate every body, then test and resolve every pair.
#[derive(Debug, Clone, Default)]
pub struct PhysicsWorld {
    pub config: WorldConfig,
    bodies: Vec<SoftBody>,
    // Contacts found during the last step, for debug drawing
    contacts: Vec<(usize, usize, SoftContact)>,
}

impl PhysicsWorld {
    /// Creates an empty world.
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
            contacts: Vec::new(),
        }
    }

    /// Validates a body, adds it to the world and returns its index.
    pub fn add_body(&mut self, body: SoftBody) -> Result<usize, PhysicsError> {
        body.validate()?;
        let index = self.bodies.len();
        self.bodies.push(body);
        Ok(index)
    }

    pub fn body(&self, index: usize) -> Option<&SoftBody> {
        self.bodies.get(index)
    }

    pub fn body_mut(&mut self, index: usize) -> Option<&mut SoftBody> {
        self.bodies.get_mut(index)
    }

    pub fn bodies(&self) -> &[SoftBody] {
        &self.bodies
    }

    /// Removes a body. Bodies after it shift down one index.
    pub fn remove_body(&mut self, index: usize) -> Option<SoftBody> {
        if index >= self.bodies.len() {
            return None;
        }
        self.contacts.clear();
        Some(self.bodies.remove(index))
    }

    /// Mutable access to two different bodies at once, `None` if the indices
    /// are equal or out of range.
    pub fn body_pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut SoftBody, &mut SoftBody)> {
        if a == b || a >= self.bodies.len() || b >= self.bodies.len() {
            return None;
        }
        if a < b {
            let (head, tail) = self.bodies.split_at_mut(b);
            Some((&mut head[a], &mut tail[0]))
        } else {
            let (head, tail) = self.bodies.split_at_mut(a);
            Some((&mut tail[0], &mut head[b]))
        }
    }

    /// `(a, b, contact)` for every pair that collided during the last step.
    pub fn contacts(&self) -> &[(usize, usize, SoftContact)] {
        &self.contacts
    }

    /// Advances the simulation by `dt`.
    ///
    /// Each body is integrated in turn; the first one that fails stops the
    /// step and its error is returned. That body keeps its previous state,
    /// bodies before it have already moved. Afterwards every pair is tested
    /// once and each hit is resolved straight away, so later pairs see the
    /// corrected positions.
    pub fn step(&mut self, dt: f64) -> Result<(), PhysicsError> {
        self.contacts.clear();

        for (index, body) in self.bodies.iter_mut().enumerate() {
            if let Err(err) = integrator::advance(body, &self.config, dt) {
                log::warn!("step aborted at body {index}: {err}");
                return Err(err);
            }
        }

        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let (head, tail) = self.bodies.split_at_mut(j);
                let (body_a, body_b) = (&mut head[i], &mut tail[0]);

                if let Some(contact) = check_soft_bodies(body_a, body_b) {
                    log::debug!(
                        "contact between bodies {i} and {j}: point {} edge {} depth {:.4}",
                        contact.point,
                        contact.edge,
                        contact.distance
                    );
                    resolve_soft_contact(body_a, body_b, &contact);
                    self.contacts.push((i, j, contact));
                }
            }
        }

        log::debug!(
            "stepped {} bodies by {dt}, {} contacts",
            self.bodies.len(),
            self.contacts.len()
        );
        Ok(())
    }
}
