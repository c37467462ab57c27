//! The animated population: ornaments, dust and photo frames.
//!
//! Ornaments and dust are created in bulk and regenerated by `rebuild`.
//! Photo frames come and go one at a time and survive rebuilds. A photo id is
//! unique among live objects.

use fnv::FnvHashMap;
use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SceneConfig;
use crate::constants::TOPPER_LIFT;
use crate::error::{SceneError, StoreError};
use crate::object::{AnimatedObject, AnimationContext, ObjectId, ObjectKind};
use crate::photo::{PhotoAsset, PhotoStore};

pub const DEFAULT_PHOTO_ID: &str = "default";

pub struct Scene {
    config: SceneConfig,
    objects: Vec<AnimatedObject>,
    photo_index: FnvHashMap<String, ObjectId>,
    next_id: u64,
    import_seq: u64,
    rng: StdRng,
}

impl Scene {
    pub fn new(config: SceneConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: SceneConfig, rng: StdRng) -> Self {
        let mut scene = Self {
            config,
            objects: Vec::new(),
            photo_index: FnvHashMap::default(),
            next_id: 0,
            import_seq: 0,
            rng,
        };
        scene.populate();
        scene
    }

    fn alloc_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    fn populate(&mut self) {
        let (height, radius) = (self.config.tree_height, self.config.tree_radius);
        self.objects
            .reserve(self.config.tree_count + self.config.dust_count);
        for _ in 0..self.config.tree_count {
            let id = self.alloc_id();
            let kind = ObjectKind::from_ornament_sample(self.rng.gen());
            let base_scale = 0.4 + self.rng.gen::<f32>() * 0.5;
            self.objects.push(AnimatedObject::new(
                id,
                kind,
                base_scale,
                height,
                radius,
                &mut self.rng,
            ));
        }
        for _ in 0..self.config.dust_count {
            let id = self.alloc_id();
            let base_scale = 0.5 + self.rng.gen::<f32>();
            self.objects.push(AnimatedObject::new(
                id,
                ObjectKind::Dust,
                base_scale,
                height,
                radius,
                &mut self.rng,
            ));
        }
        log::info!(
            "[scene] populated {} ornaments, {} dust, {} photos",
            self.config.tree_count,
            self.config.dust_count,
            self.photo_count()
        );
    }

    /// Regenerate every non-photo object with new counts. Photo frames are
    /// kept as they are, including their current transforms.
    pub fn rebuild(&mut self, tree_count: usize, dust_count: usize) {
        self.config.tree_count = tree_count;
        self.config.dust_count = dust_count;
        self.objects.retain(|o| o.kind().is_photo());
        self.populate();
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn objects(&self) -> &[AnimatedObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&AnimatedObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn photo_count(&self) -> usize {
        self.photo_index.len()
    }

    pub fn non_photo_count(&self) -> usize {
        self.objects.len() - self.photo_count()
    }

    pub fn photo_object(&self, photo_id: &str) -> Option<ObjectId> {
        self.photo_index.get(photo_id).copied()
    }

    /// Scene-local position of the star on top of the tree. It follows the
    /// configured height and is unaffected by rebuilds and modes.
    pub fn topper_position(&self) -> Vec3 {
        Vec3::new(0.0, self.config.tree_height / 2.0 + TOPPER_LIFT, 0.0)
    }

    /// Photo frames with their world positions, in population order.
    pub fn photo_positions<'a>(
        &'a self,
        root: &'a Mat4,
    ) -> impl Iterator<Item = (ObjectId, Vec3)> + 'a {
        self.objects
            .iter()
            .filter(|o| o.kind().is_photo())
            .map(move |o| (o.id(), o.world_position(root)))
    }

    pub fn update(&mut self, ctx: &AnimationContext) {
        for object in &mut self.objects {
            object.update(ctx);
        }
    }

    // ---------------- Photos ----------------

    pub fn add_photo(&mut self, asset: PhotoAsset) -> Result<ObjectId, SceneError> {
        if self.photo_index.contains_key(&asset.id) {
            return Err(SceneError::DuplicatePhoto(asset.id));
        }
        let id = self.alloc_id();
        let photo_id = asset.id.clone();
        let object = AnimatedObject::photo(
            id,
            asset,
            self.config.tree_height,
            self.config.tree_radius,
            &mut self.rng,
        );
        self.objects.push(object);
        self.photo_index.insert(photo_id.clone(), id);
        log::info!("[photos] added {photo_id}");
        Ok(id)
    }

    /// Detach a photo frame from the population. Returns its object handle.
    pub fn remove_photo(&mut self, photo_id: &str) -> Result<ObjectId, SceneError> {
        let id = self
            .photo_index
            .remove(photo_id)
            .ok_or_else(|| SceneError::UnknownPhoto(photo_id.to_string()))?;
        self.objects.retain(|o| o.id() != id);
        log::info!("[photos] removed {photo_id}");
        Ok(id)
    }

    /// Add a framed placeholder when the scene has no photo at all.
    pub fn ensure_default_photo(&mut self) -> Option<ObjectId> {
        if self.photo_count() > 0 {
            return None;
        }
        self.add_photo(PhotoAsset::placeholder(DEFAULT_PHOTO_ID)).ok()
    }

    fn next_import_id(&mut self) -> String {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        loop {
            self.import_seq += 1;
            let id = format!("photo_{millis}_{}", self.import_seq);
            if !self.photo_index.contains_key(&id) {
                return id;
            }
        }
    }

    /// Persist a user photo and add it to the scene.
    pub fn import_photo(
        &mut self,
        store: &mut dyn PhotoStore,
        image: Vec<u8>,
    ) -> Result<ObjectId, SceneError> {
        let photo_id = self.next_import_id();
        store.add_object(&photo_id, &image)?;
        self.add_photo(PhotoAsset::new(photo_id, image))
    }

    /// Load every stored photo. Ids already present are skipped.
    pub fn restore_photos(&mut self, store: &dyn PhotoStore) -> Result<usize, SceneError> {
        let mut restored = 0;
        for (photo_id, image) in store.list_objects()? {
            match self.add_photo(PhotoAsset::new(photo_id, image)) {
                Ok(_) => restored += 1,
                Err(SceneError::DuplicatePhoto(id)) => {
                    log::warn!("[photos] skipping duplicate stored photo {id}");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(restored)
    }

    /// Remove a photo from the store and the scene.
    ///
    /// Photos that were never persisted (preloaded or default) are only
    /// removed from the scene.
    pub fn delete_photo(
        &mut self,
        store: &mut dyn PhotoStore,
        photo_id: &str,
    ) -> Result<ObjectId, SceneError> {
        if !self.photo_index.contains_key(photo_id) {
            return Err(SceneError::UnknownPhoto(photo_id.to_string()));
        }
        match store.remove_object(photo_id) {
            Ok(()) | Err(StoreError::Missing(_)) => {}
            Err(e) => return Err(e.into()),
        }
        self.remove_photo(photo_id)
    }

    /// Remove every photo frame and empty the store. Returns the removed
    /// object handles.
    pub fn clear_photos(
        &mut self,
        store: &mut dyn PhotoStore,
    ) -> Result<Vec<ObjectId>, SceneError> {
        for (photo_id, _) in store.list_objects()? {
            match store.remove_object(&photo_id) {
                Ok(()) | Err(StoreError::Missing(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        let removed: Vec<ObjectId> = self.photo_index.drain().map(|(_, id)| id).collect();
        self.objects.retain(|o| !o.kind().is_photo());
        log::info!("[photos] cleared {} photos", removed.len());
        Ok(removed)
    }
}
