//! Conflict detection across a whole run: codes and names are unique per vendor.

use crate::avp::Avp;
use crate::error::Error;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Registry {
    by_code: HashMap<(u32, u32), Avp>,
    by_name: HashMap<(u32, String), Avp>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the AVP's (vendor, code) and (vendor, name). On a hit nothing is inserted.
    pub fn claim(&mut self, avp: &Avp) -> Result<(), Error> {
        let existing = self
            .by_code
            .get(&(avp.vendor, avp.code))
            .or_else(|| self.by_name.get(&(avp.vendor, avp.name.clone())));
        if let Some(existing) = existing {
            return Err(if existing == avp {
                Error::DuplicateDefinition {
                    location: avp.location.clone(),
                    avp: avp.describe(),
                    previous: existing.location.clone(),
                }
            } else {
                Error::ConflictingDefinition {
                    location: avp.location.clone(),
                    avp: avp.describe(),
                    existing: existing.describe(),
                    previous: existing.location.clone(),
                }
            });
        }
        self.by_code.insert((avp.vendor, avp.code), avp.clone());
        self.by_name.insert((avp.vendor, avp.name.clone()), avp.clone());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
