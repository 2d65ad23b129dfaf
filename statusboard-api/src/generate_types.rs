//! TypeScript type generation module.
//!
//! Exports TypeScript definitions for the JSON payloads of the status API
//! so the status page can be type-checked against them.

#[cfg(test)]
mod tests {
    use std::{env, path::Path};

    use ts_rs::TS;

    use crate::api::health::HealthStatus;
    use crate::api::status::UpdateResponse;
    use crate::error::ErrorResponse;
    use crate::models::{StatusRecord, StatusUpdate};

    #[test]
    fn generate_typescript_types() {
        // STATUSBOARD_TS_OUTPUT_DIR wins; otherwise ../ts-bindings next to
        // the crate.
        let output_dir_str = env::var("STATUSBOARD_TS_OUTPUT_DIR")
            .unwrap_or_else(|_| "../ts-bindings".to_string());
        let output_dir = Path::new(&output_dir_str);

        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir).expect("Failed to create output directory");
        }

        // Remove stale definitions so renamed types do not linger
        for entry in std::fs::read_dir(output_dir).expect("Failed to read output directory") {
            let path = entry.expect("Failed to read directory entry").path();
            if path.extension().and_then(|s| s.to_str()) == Some("ts") {
                std::fs::remove_file(&path)
                    .unwrap_or_else(|e| panic!("Failed to remove {:?}: {}", path, e));
            }
        }

        StatusRecord::export_all_to(output_dir).expect("Failed to export StatusRecord type");
        StatusUpdate::export_all_to(output_dir).expect("Failed to export StatusUpdate type");
        UpdateResponse::export_all_to(output_dir).expect("Failed to export UpdateResponse type");
        ErrorResponse::export_all_to(output_dir).expect("Failed to export ErrorResponse type");
        HealthStatus::export_all_to(output_dir).expect("Failed to export HealthStatus type");

        assert!(output_dir.join("StatusRecord.ts").exists());
        println!("TypeScript types generated successfully in {:?}", output_dir);
    }
}
