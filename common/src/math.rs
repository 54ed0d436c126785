/// Scales `values` in place so that they sum to one. Leaves them untouched when the sum is zero.
pub fn normalize_in_place(values: &mut [f32]) -> f32 {
    let sum: f32 = values.iter().sum();

    if sum != 0.0 {
        for v in values.iter_mut() {
            *v /= sum;
        }
    }

    sum
}
