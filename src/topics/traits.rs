// Topic modeler trait.
//
// Keeps the clustering approach swappable. The shipped implementation is
// TF-IDF vectors with cosine k-means.

use super::model::{build_topic_model, Document, TopicModelOptions, TopicModelResult};

/// Anything that can group a batch of documents into topics.
pub trait TopicModeler {
    fn model(&self, documents: &[Document]) -> TopicModelResult;
}

/// TF-IDF + cosine k-means.
#[derive(Debug, Clone, Default)]
pub struct KMeansTopicModeler {
    pub options: TopicModelOptions,
}

impl KMeansTopicModeler {
    pub fn new(options: TopicModelOptions) -> Self {
        Self { options }
    }
}

impl TopicModeler for KMeansTopicModeler {
    fn model(&self, documents: &[Document]) -> TopicModelResult {
        build_topic_model(documents, &self.options)
    }
}
