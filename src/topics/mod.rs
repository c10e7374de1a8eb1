// Topic modeling: TF-IDF vectors clustered with cosine k-means.

pub mod kmeans;
pub mod model;
pub mod tfidf;
pub mod traits;

pub use model::{
    build_topic_model, generate_topic_label, Document, ModelMetrics, Topic, TopicAssignment,
    TopicModelOptions, TopicModelResult,
};
pub use traits::{KMeansTopicModeler, TopicModeler};
