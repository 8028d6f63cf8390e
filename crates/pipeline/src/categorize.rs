use crate::normalize::NormalizedActivity;
use epu_domain::Phase;

/// The activity whose repeated occurrence delimits the three phases.
///
/// The feed yard appears once at the end of the shutdown procedure and once
/// at the end of maintenance, so scanning the file bottom-up and counting
/// occurrences splits the list into startup / maintenance / shutdown. This
/// is a positional heuristic inherited from the source spreadsheets: if the
/// sentinel is renamed, reordered or duplicated the partition is still
/// structurally valid but may be semantically wrong.
pub const SENTINEL_ACTIVITY: &str = "Pátio de Alimentação";

/// Cursor of the reverse scan: the bucket currently being filled and how
/// many sentinel occurrences have been seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanState {
    pub phase: Phase,
    pub sentinel_hits: u8,
}

impl ScanState {
    /// The reverse scan starts in the shutdown bucket with no hits.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            phase: Phase::Parada,
            sentinel_hits: 0,
        }
    }

    /// One fold step: check the sentinel, then pick the bucket.
    ///
    /// The switch happens before the assignment for the same activity, so
    /// the row containing the first sentinel occurrence lands in the bucket
    /// being switched *to*. The first hit switches to maintenance, the
    /// second to startup; further hits change nothing.
    #[must_use]
    pub fn step(self, name: &str) -> (Self, Phase) {
        let mut next = self;
        if name.contains(SENTINEL_ACTIVITY) {
            next.sentinel_hits = next.sentinel_hits.saturating_add(1);
            match next.sentinel_hits {
                1 => next.phase = Phase::Manutencao,
                2 => next.phase = Phase::Partida,
                _ => {}
            }
        }
        (next, next.phase)
    }
}

/// The three phase buckets, each in original top-to-bottom file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizedSet {
    pub procedimento_parada: Vec<NormalizedActivity>,
    pub manutencao: Vec<NormalizedActivity>,
    pub procedimento_partida: Vec<NormalizedActivity>,
}

impl CategorizedSet {
    pub fn bucket_mut(&mut self, phase: Phase) -> &mut Vec<NormalizedActivity> {
        match phase {
            Phase::Parada => &mut self.procedimento_parada,
            Phase::Manutencao => &mut self.manutencao,
            Phase::Partida => &mut self.procedimento_partida,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.procedimento_parada.len() + self.manutencao.len() + self.procedimento_partida.len()
    }
}

/// Partition the ordered activity list into the three phases.
///
/// The list is scanned in reverse with a [`ScanState`] fold, then each
/// bucket is reversed back to original file order. The partition is total:
/// every activity lands in exactly one bucket.
#[must_use]
pub fn categorize(activities: Vec<NormalizedActivity>) -> CategorizedSet {
    let mut set = CategorizedSet::default();
    let mut state = ScanState::initial();

    for activity in activities.into_iter().rev() {
        let (next, bucket) = state.step(&activity.name);
        state = next;
        set.bucket_mut(bucket).push(activity);
    }

    set.procedimento_parada.reverse();
    set.manutencao.reverse();
    set.procedimento_partida.reverse();
    set
}
