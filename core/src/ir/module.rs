use uuid::Uuid;

use super::synthesized::{SynthesizedMembers, SynthesizedMethod};
use super::well_known::WellKnownMembers;

/// Per-compilation-unit state shared by every function lowered in it.
///
/// Lowering workers only ever hold `&CompilationModule`; the synthesized
/// member container is the one part that changes during lowering.
#[derive(Debug)]
pub struct CompilationModule {
    id: Uuid,
    name: String,
    synthesized: SynthesizedMembers,
    well_known: WellKnownMembers,
}

impl CompilationModule {
    pub fn new(name: &str) -> Self {
        CompilationModule {
            id: Uuid::new_v4(),
            name: name.to_string(),
            synthesized: SynthesizedMembers::new(),
            well_known: WellKnownMembers::resolve(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn synthesized(&self) -> &SynthesizedMembers {
        &self.synthesized
    }

    pub fn well_known(&self) -> &WellKnownMembers {
        &self.well_known
    }

    /// Synthesized members in emission order.
    pub fn synthesized_methods(&self) -> Vec<SynthesizedMethod> {
        self.synthesized.methods()
    }
}

impl std::fmt::Display for CompilationModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "module {} ({})", self.name, self.id)?;
        for method in self.synthesized.methods() {
            writeln!(f)?;
            write!(f, "{}", method)?;
        }
        Ok(())
    }
}
