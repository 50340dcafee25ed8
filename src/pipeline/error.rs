use thiserror::Error;

/// Batch-level failures. Per-ingredient failures never surface here; they
/// terminate as `MappingResult`s instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("ingredient list is empty")]
    EmptyIngredientList,

    #[error("blank ingredient name at input position {position}")]
    BlankIngredient { position: usize },
}
