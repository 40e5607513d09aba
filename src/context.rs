//! Shared request context.

use std::path::PathBuf;

use clusterwatch_adapters::couchbase::{Aggregator, Timeouts};
use clusterwatch_adapters::AdapterError;
use clusterwatch_types::{BucketReport, ClusterConfig, IndexStatusEntry, ShapedCluster};
use tokio::task;
use tracing::{debug, error};

use crate::config::Settings;
use crate::data::shape;
use crate::error::DashboardError;

/// Where cluster definitions come from.
#[derive(Debug, Clone)]
pub enum ClusterSource {
    /// Re-read from the settings file on every request.
    File(PathBuf),
    /// A fixed list.
    Fixed(Vec<ClusterConfig>),
}

/// State built once at startup and shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppContext {
    source: ClusterSource,
    timeouts: Timeouts,
}

impl AppContext {
    pub fn new(source: ClusterSource, timeouts: Timeouts) -> Self {
        Self { source, timeouts }
    }

    /// Current cluster list. An unreadable settings file yields no clusters.
    ///
    /// The file is read on the blocking pool.
    pub async fn clusters(&self) -> Vec<ClusterConfig> {
        let path = match &self.source {
            ClusterSource::Fixed(clusters) => return clusters.clone(),
            ClusterSource::File(path) => path.clone(),
        };

        match task::spawn_blocking(move || Settings::load(&path)).await {
            Ok(Ok(settings)) => settings.clusters,
            Ok(Err(e)) => {
                error!(error = %e, "Error loading config");
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "config reload task failed");
                Vec::new()
            }
        }
    }

    /// A fresh aggregator for one pass.
    pub fn aggregator(&self) -> Result<Aggregator, AdapterError> {
        Aggregator::connect(self.timeouts)
    }

    /// Aggregate and shape every configured cluster.
    ///
    /// ```
    /// use clusterwatch::{AppContext, ClusterSource};
    /// use clusterwatch_adapters::couchbase::Timeouts;
    /// use clusterwatch_types::ClusterConfig;
    ///
    /// # tokio_test::block_on(async {
    /// let idle = ClusterConfig::new("http://10.0.0.1:8091", "admin", "secret").with_watch(false);
    /// let ctx = AppContext::new(ClusterSource::Fixed(vec![idle]), Timeouts::default());
    ///
    /// let clusters = ctx.dashboard().await.unwrap();
    /// assert!(clusters[0].not_watching);
    /// # });
    /// ```
    pub async fn dashboard(&self) -> Result<Vec<ShapedCluster>, DashboardError> {
        let clusters = self.clusters().await;
        if clusters.is_empty() {
            return Err(DashboardError::NoClusters);
        }

        debug!(clusters = clusters.len(), "aggregating clusters");
        let aggregates = self.aggregator()?.aggregate(&clusters).await;
        Ok(shape(&aggregates))
    }

    /// Index status of every watched cluster.
    pub async fn index_status(&self) -> Result<Vec<IndexStatusEntry>, DashboardError> {
        let clusters = self.clusters().await;
        if clusters.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self.aggregator()?.index_status(&clusters).await)
    }

    /// Stats and detail for one bucket. `cluster_host` is the bare host name
    /// and matches a configured host of `http://{cluster_host}:8091`.
    pub async fn bucket_report(
        &self,
        cluster_host: &str,
        bucket: &str,
    ) -> Result<BucketReport, DashboardError> {
        let target = format!("http://{}:8091", cluster_host);
        let cluster = self
            .clusters()
            .await
            .into_iter()
            .find(|c| c.host == target)
            .ok_or(DashboardError::ClusterNotFound)?;

        Ok(self.aggregator()?.bucket_report(&cluster, bucket).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_clusters_reread_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"[{"host": "http://a:8091", "user": "u", "pass": "p"}]"#)
            .unwrap();
        file.flush().unwrap();
        let ctx = AppContext::new(
            ClusterSource::File(file.path().to_path_buf()),
            Timeouts::default(),
        );

        assert_eq!(ctx.clusters().await.len(), 1);

        std::fs::write(
            file.path(),
            br#"[{"host": "http://a:8091", "user": "u", "pass": "p"},
                 {"host": "http://b:8091", "user": "u", "pass": "p"}]"#,
        )
        .unwrap();
        assert_eq!(ctx.clusters().await.len(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_file_yields_no_clusters() {
        let ctx = AppContext::new(
            ClusterSource::File(PathBuf::from("/nonexistent/config.json")),
            Timeouts::default(),
        );
        assert!(ctx.clusters().await.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_without_clusters() {
        let ctx = AppContext::new(ClusterSource::Fixed(Vec::new()), Timeouts::default());
        assert!(matches!(ctx.dashboard().await, Err(DashboardError::NoClusters)));
    }

    #[tokio::test]
    async fn test_dashboard_unwatched_only() {
        let ctx = AppContext::new(
            ClusterSource::Fixed(vec![
                ClusterConfig::new("http://a:8091", "u", "p").with_watch(false)
            ]),
            Timeouts::default(),
        );

        let shaped = ctx.dashboard().await.unwrap();

        assert_eq!(shaped.len(), 1);
        assert_eq!(shaped[0].cluster_name, "Not Watching");
    }

    #[tokio::test]
    async fn test_bucket_report_unknown_cluster() {
        let ctx = AppContext::new(
            ClusterSource::Fixed(vec![ClusterConfig::new("http://a:8091", "u", "p")]),
            Timeouts::default(),
        );

        let result = ctx.bucket_report("nope", "travel-sample").await;

        assert!(matches!(result, Err(DashboardError::ClusterNotFound)));
    }
}
