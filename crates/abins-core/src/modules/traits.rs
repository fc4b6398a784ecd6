use crate::domain::{ComputeArtifact, ComputeRequest, ComputeResult};

pub trait ModuleExecutor {
    fn execute(&self, request: &ComputeRequest) -> ComputeResult<Vec<ComputeArtifact>>;
}

#[cfg(test)]
mod tests {
    use super::ModuleExecutor;
    use crate::domain::{
        AbinsError, AbinsErrorCategory, ComputeArtifact, ComputeModule, ComputeRequest,
    };

    struct FailingExecutor;

    impl ModuleExecutor for FailingExecutor {
        fn execute(
            &self,
            _request: &ComputeRequest,
        ) -> crate::domain::ComputeResult<Vec<ComputeArtifact>> {
            Err(AbinsError::computation(
                "RUN.MODULE",
                "module execution failed",
            ))
        }
    }

    #[test]
    fn module_executor_uses_shared_error_types() {
        let request = ComputeRequest::new(
            "FX-DW-001",
            ComputeModule::DwCrystal,
            "phonon.json",
            "out",
            300.0,
        );
        let error = FailingExecutor
            .execute(&request)
            .expect_err("executor should fail");
        assert_eq!(error.category(), AbinsErrorCategory::Computation);
        assert_eq!(error.exit_code(), 4);
        assert_eq!(error.placeholder(), "RUN.MODULE");
    }
}
