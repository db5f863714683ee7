//! Background removal: model input preparation and saliency-mask compositing.

/// Model input tensors and the saliency model trait.
pub mod model;
/// Saliency grids and alpha compositing.
pub mod saliency;
