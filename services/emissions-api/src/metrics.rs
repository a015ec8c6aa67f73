use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};

/// Prometheus counters for validation and calculation traffic.
#[derive(Clone)]
pub struct ApiMetrics {
    validations_total: IntCounter,
    validation_failures_total: IntCounter,
    calculations_total: IntCounter,
    calculation_failures_total: IntCounter,
}

impl ApiMetrics {
    pub fn new(registry: &Registry, namespace: &str) -> prometheus::Result<Self> {
        let counter = |name: &str, help: &str| -> prometheus::Result<IntCounter> {
            let counter = IntCounter::with_opts(Opts::new(name, help).namespace(namespace))?;
            registry.register(Box::new(counter.clone()))?;
            Ok(counter)
        };

        Ok(Self {
            validations_total: counter("validations_total", "Reports validated")?,
            validation_failures_total: counter("validation_failures_total", "Reports that failed validation")?,
            calculations_total: counter("calculations_total", "Emission calculations attempted")?,
            calculation_failures_total: counter("calculation_failures_total", "Emission calculations that failed")?,
        })
    }

    pub fn record_validation(&self, valid: bool) {
        self.validations_total.inc();
        if !valid {
            self.validation_failures_total.inc();
        }
    }

    pub fn record_calculations(&self, attempted: usize, failed: usize) {
        self.calculations_total.inc_by(attempted as u64);
        self.calculation_failures_total.inc_by(failed as u64);
    }
}

/// Text exposition of everything registered in `registry`.
pub fn encode(registry: &Registry) -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&registry.gather(), &mut buffer).is_err() {
        return "Error encoding metrics".to_string();
    }
    String::from_utf8(buffer).unwrap_or_else(|_| "Error encoding metrics".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_exposed_with_namespace() {
        let registry = Registry::new();
        let metrics = ApiMetrics::new(&registry, "airinv").unwrap();
        metrics.record_validation(false);
        metrics.record_calculations(3, 1);

        let text = encode(&registry);
        assert!(text.contains("airinv_validations_total 1"));
        assert!(text.contains("airinv_validation_failures_total 1"));
        assert!(text.contains("airinv_calculations_total 3"));
        assert!(text.contains("airinv_calculation_failures_total 1"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let registry = Registry::new();
        assert!(ApiMetrics::new(&registry, "airinv").is_ok());
        assert!(ApiMetrics::new(&registry, "airinv").is_err());
    }
}
