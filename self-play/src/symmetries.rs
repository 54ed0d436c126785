use board::Symmetry;
use model::TrainingExample;

/// Expands every example into its eight dihedral images.
///
/// The board and the policy go through the same transform so that a probability stays attached
/// to the cell it was given for. Symmetric positions produce duplicates, which are kept.
pub fn augment(examples: &[TrainingExample]) -> Vec<TrainingExample> {
    let symmetries = Symmetry::all();
    let mut augmented = Vec::with_capacity(examples.len() * symmetries.len());

    for example in examples {
        for symmetry in symmetries.iter() {
            augmented.push(TrainingExample::new(
                example.size,
                symmetry.apply(&example.board, example.size),
                symmetry.apply(&example.policy, example.size),
                example.value,
            ));
        }
    }

    augmented
}
