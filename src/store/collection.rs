use tokio::sync::RwLock;

/// Anything kept in a [`Collection`].
pub trait Record: Clone + Send + Sync {
    fn id(&self) -> &str;
}

/// An in-memory table that keeps insertion order.
pub struct Collection<T> {
    items: RwLock<Vec<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    pub async fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.items
            .read()
            .await
            .iter()
            .filter(|item| pred(item))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.items.read().await.iter().find(|i| i.id() == id).cloned()
    }

    pub async fn insert(&self, item: T) -> T {
        self.items.write().await.push(item.clone());
        item
    }

    /// Inserts `item` unless an existing record matches `clash`; the check and
    /// the insert happen under one write lock.
    pub async fn insert_unless(&self, item: T, clash: impl Fn(&T) -> bool) -> Option<T> {
        let mut items = self.items.write().await;
        if items.iter().any(clash) {
            return None;
        }
        items.push(item.clone());
        Some(item)
    }

    /// Applies `f` to the record with `id` and returns the result.
    pub async fn update(&self, id: &str, f: impl FnOnce(&mut T)) -> Option<T> {
        let mut items = self.items.write().await;
        let item = items.iter_mut().find(|i| i.id() == id)?;
        f(item);
        Some(item.clone())
    }

    pub async fn remove(&self, id: &str) -> bool {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|i| i.id() != id);
        items.len() != before
    }
}

macro_rules! impl_record {
    ($($t:ty),* $(,)?) => {
        $(
            impl Record for $t {
                #[inline]
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_record! {
    crate::models::Club,
    crate::models::Announcement,
    crate::models::Note,
    crate::models::Post,
    crate::models::Location,
    crate::models::WhatsappGroup,
    crate::models::Event,
    crate::models::EventAttendee,
}
