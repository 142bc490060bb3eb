use crate::aggregate::ParticipantGroups;
use crate::data::Trial;

/// Shuffles key presses within each participant while keeping every trial's
/// length and position. Returns one key sequence per trial, in trial order.
///
/// Each participant's keys are pooled, shuffled uniformly and cut back into
/// segments of the original lengths. Keys never cross participant boundaries
/// and `trials` is left untouched.
pub fn shuffle_within_participants(
    trials: &[Trial],
    groups: &ParticipantGroups,
    rng: &mut fastrand::Rng,
) -> Vec<Vec<char>> {
    let mut shuffled: Vec<Vec<char>> = vec![Vec::new(); trials.len()];
    let mut pool: Vec<char> = Vec::new();

    for members in &groups.members {
        pool.clear();
        for &i in members {
            pool.extend_from_slice(&trials[i].keys);
        }
        rng.shuffle(&mut pool);

        let mut offset = 0;
        for &i in members {
            let len = trials[i].keys.len();
            shuffled[i] = pool[offset..offset + len].to_vec();
            offset += len;
        }
    }

    shuffled
}
