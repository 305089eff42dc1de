use crate::commands::{build_runtime, load_config, migrated_pool, CommandResult};

pub fn run() -> CommandResult {
    let config = match load_config("migrate") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("migrate") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = migrated_pool(&config).await?;
        pool.close().await;
        Ok::<(), crate::commands::StepFailure>(())
    });

    match result {
        Ok(()) => CommandResult::success("migrate", "applied pending migrations"),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("migrate", error_class, message, exit_code)
        }
    }
}
