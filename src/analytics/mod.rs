pub mod corpus;
pub mod efficiency;
pub mod heatmap;
pub mod kpi;
pub mod quantile;
pub mod rollup;
pub mod variability;
