mod m0001_initial;
mod m0002_tracked_sources;

use cetane::prelude::MigrationRegistry;

pub fn registry() -> MigrationRegistry {
    let mut reg = MigrationRegistry::new();
    reg.register(m0001_initial::migration());
    reg.register(m0002_tracked_sources::migration());
    reg
}
