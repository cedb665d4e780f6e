//! Generic CRUD over one collection.
//!
//! One `ResourceService` is instantiated per resource type. Writes validate
//! the input, check every reference field against its target collection (in
//! the order the resource declares them), and then hit the document store.
//! Nothing is transactional: a referenced record can disappear right after the
//! check, and deletes never cascade.

use super::{ServiceError, ServiceResult, parse_id};
use crate::{
    models::{EntityKind, Resource},
    store::{DocumentStore, StoreError, decode},
};
use mongodb::bson::{Document, oid::ObjectId, to_document};
use std::{marker::PhantomData, sync::Arc};
use tracing::{debug, info, instrument};
use validator::Validate;

pub struct ResourceService<R> {
    store: Arc<dyn DocumentStore>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    fn collection() -> &'static str {
        R::KIND.collection()
    }

    /// Validate `input` and encode it as the document to be written.
    fn prepare(input: &R::Input) -> ServiceResult<Document> {
        input
            .validate()
            .map_err(|errors| ServiceError::from_validation(&errors, R::FIELDS))?;
        Ok(to_document(input).map_err(StoreError::from)?)
    }

    /// Every reference must parse and resolve; the first failure wins.
    async fn check_references(&self, input: &R::Input) -> ServiceResult<()> {
        for reference in R::references(input) {
            let id = parse_id(reference.kind, reference.id)?;
            if !self.exists(reference.kind, &id).await? {
                debug!(kind = %reference.kind, %id, "referenced record missing");
                return Err(ServiceError::NotFound(reference.kind));
            }
        }
        Ok(())
    }

    async fn exists(&self, kind: EntityKind, id: &ObjectId) -> ServiceResult<bool> {
        Ok(self.store.find_one(kind.collection(), id).await?.is_some())
    }

    async fn fetch(&self, id: &ObjectId) -> ServiceResult<R> {
        let document = self
            .store
            .find_one(Self::collection(), id)
            .await?
            .ok_or(ServiceError::NotFound(R::KIND))?;
        Ok(decode(Self::collection(), document)?)
    }

    #[instrument(skip(self, input), fields(kind = %R::KIND))]
    pub async fn create(&self, input: R::Input) -> ServiceResult<R> {
        let document = Self::prepare(&input)?;
        self.check_references(&input).await?;

        let id = self.store.insert_one(Self::collection(), document).await?;
        info!(%id, "created");
        self.fetch(&id).await
    }

    /// All records in storage-native order.
    #[instrument(skip(self), fields(kind = %R::KIND))]
    pub async fn list(&self) -> ServiceResult<Vec<R>> {
        self.store
            .find_all(Self::collection())
            .await?
            .into_iter()
            .map(|document| decode(Self::collection(), document).map_err(ServiceError::from))
            .collect()
    }

    #[instrument(skip(self), fields(kind = %R::KIND))]
    pub async fn get(&self, id: &str) -> ServiceResult<R> {
        let id = parse_id(R::KIND, id)?;
        self.fetch(&id).await
    }

    /// Replace every input field of the record. Attachment fields are kept.
    #[instrument(skip(self, input), fields(kind = %R::KIND))]
    pub async fn update(&self, id: &str, input: R::Input) -> ServiceResult<R> {
        let document = Self::prepare(&input)?;
        let id = parse_id(R::KIND, id)?;
        self.check_references(&input).await?;

        if !self
            .store
            .update_fields(Self::collection(), &id, document)
            .await?
        {
            return Err(ServiceError::NotFound(R::KIND));
        }
        info!(%id, "updated");
        self.fetch(&id).await
    }

    /// Remove the record. Records referencing it are left as they are.
    #[instrument(skip(self), fields(kind = %R::KIND))]
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(R::KIND, id)?;
        if !self.store.delete_one(Self::collection(), &id).await? {
            return Err(ServiceError::NotFound(R::KIND));
        }
        info!(%id, "deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            Attendee, AttendeeInput, Booking, BookingInput, Event, EventInput, Venue, VenueInput,
        },
        store::MemoryDocumentStore,
    };
    use mongodb::bson::doc;

    fn store() -> Arc<dyn DocumentStore> {
        Arc::new(MemoryDocumentStore::new("test"))
    }

    fn hall() -> VenueInput {
        VenueInput {
            name: "Hall A".into(),
            address: "1 Main St".into(),
            capacity: 100,
        }
    }

    fn launch(venue_id: String) -> EventInput {
        EventInput {
            name: "Launch".into(),
            description: None,
            venue_id,
            date: "2026-05-01".into(),
            max_attendees: 50,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let venues = ResourceService::<Venue>::new(store());
        let created = venues.create(hall()).await.unwrap();
        assert_eq!(created.name, "Hall A");
        assert_eq!(created.capacity, 100);
        assert_eq!(created.photo_id, None);

        let fetched = venues.get(&created.id.to_hex()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn update_replaces_all_fields() {
        let venues = ResourceService::<Venue>::new(store());
        let created = venues.create(hall()).await.unwrap();
        let id = created.id.to_hex();

        let replacement = VenueInput {
            name: "Hall B".into(),
            address: "2 Side St".into(),
            capacity: 7,
        };
        let updated = venues.update(&id, replacement.clone()).await.unwrap();
        assert_eq!(updated.id, created.id);

        let fetched = venues.get(&id).await.unwrap();
        assert_eq!(fetched.name, replacement.name);
        assert_eq!(fetched.address, replacement.address);
        assert_eq!(fetched.capacity, replacement.capacity);
    }

    #[tokio::test]
    async fn update_keeps_attachments() {
        let docs = store();
        let venues = ResourceService::<Venue>::new(Arc::clone(&docs));
        let created = venues.create(hall()).await.unwrap();
        let photo = ObjectId::new();
        docs.update_fields("venues", &created.id, doc! { "photo_id": photo })
            .await
            .unwrap();

        let updated = venues
            .update(&created.id.to_hex(), hall())
            .await
            .unwrap();
        assert_eq!(updated.photo_id, Some(photo));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let venues = ResourceService::<Venue>::new(store());
        let id = venues.create(hall()).await.unwrap().id.to_hex();
        venues.delete(&id).await.unwrap();

        assert!(matches!(
            venues.get(&id).await,
            Err(ServiceError::NotFound(EntityKind::Venue))
        ));
        assert!(matches!(
            venues.delete(&id).await,
            Err(ServiceError::NotFound(EntityKind::Venue))
        ));
    }

    #[tokio::test]
    async fn malformed_ids_are_rejected_before_lookup() {
        let venues = ResourceService::<Venue>::new(store());
        assert!(matches!(
            venues.get("nope").await,
            Err(ServiceError::InvalidId(EntityKind::Venue))
        ));
        assert!(matches!(
            venues.update("nope", hall()).await,
            Err(ServiceError::InvalidId(EntityKind::Venue))
        ));
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let venues = ResourceService::<Venue>::new(store());
        let missing = ObjectId::new().to_hex();
        assert!(matches!(
            venues.update(&missing, hall()).await,
            Err(ServiceError::NotFound(EntityKind::Venue))
        ));
    }

    #[tokio::test]
    async fn event_with_unknown_venue_is_not_written() {
        let docs = store();
        let events = ResourceService::<Event>::new(Arc::clone(&docs));

        let err = events
            .create(launch(ObjectId::new().to_hex()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(EntityKind::Venue)));
        assert!(docs.find_all("events").await.unwrap().is_empty());

        let err = events.create(launch("bad".into())).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidId(EntityKind::Venue)));
    }

    #[tokio::test]
    async fn event_with_existing_venue_is_created() {
        let docs = store();
        let venues = ResourceService::<Venue>::new(Arc::clone(&docs));
        let events = ResourceService::<Event>::new(Arc::clone(&docs));

        let venue = venues.create(hall()).await.unwrap();
        let event = events.create(launch(venue.id.to_hex())).await.unwrap();
        assert_eq!(event.venue_id, venue.id.to_hex());
        assert_eq!(events.list().await.unwrap(), vec![event]);
    }

    #[tokio::test]
    async fn update_checks_references_like_create() {
        let docs = store();
        let venues = ResourceService::<Venue>::new(Arc::clone(&docs));
        let events = ResourceService::<Event>::new(Arc::clone(&docs));

        let venue = venues.create(hall()).await.unwrap();
        let event = events.create(launch(venue.id.to_hex())).await.unwrap();
        let id = event.id.to_hex();

        let dangling = EventInput {
            name: "Moved".into(),
            ..launch(ObjectId::new().to_hex())
        };
        assert!(matches!(
            events.update(&id, dangling).await,
            Err(ServiceError::NotFound(EntityKind::Venue))
        ));

        let malformed = EventInput {
            name: "Moved".into(),
            ..launch("bad".into())
        };
        assert!(matches!(
            events.update(&id, malformed).await,
            Err(ServiceError::InvalidId(EntityKind::Venue))
        ));

        assert_eq!(events.get(&id).await.unwrap(), event);
    }

    #[tokio::test]
    async fn event_and_attendee_round_trip_through_get() {
        let docs = store();
        let venues = ResourceService::<Venue>::new(Arc::clone(&docs));
        let events = ResourceService::<Event>::new(Arc::clone(&docs));
        let attendees = ResourceService::<Attendee>::new(Arc::clone(&docs));

        let venue = venues.create(hall()).await.unwrap();
        let event = events
            .create(EventInput {
                description: Some("Product launch".into()),
                ..launch(venue.id.to_hex())
            })
            .await
            .unwrap();
        assert_eq!(events.get(&event.id.to_hex()).await.unwrap(), event);

        let attendee = attendees
            .create(AttendeeInput {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                phone: Some("555-0100".into()),
            })
            .await
            .unwrap();
        assert_eq!(attendees.get(&attendee.id.to_hex()).await.unwrap(), attendee);
    }

    #[tokio::test]
    async fn deleting_a_venue_leaves_events_dangling() {
        let docs = store();
        let venues = ResourceService::<Venue>::new(Arc::clone(&docs));
        let events = ResourceService::<Event>::new(Arc::clone(&docs));

        let venue = venues.create(hall()).await.unwrap();
        let event = events.create(launch(venue.id.to_hex())).await.unwrap();
        venues.delete(&venue.id.to_hex()).await.unwrap();

        let fetched = events.get(&event.id.to_hex()).await.unwrap();
        assert_eq!(fetched.venue_id, venue.id.to_hex());
    }

    #[tokio::test]
    async fn booking_checks_event_before_attendee() {
        let docs = store();
        let bookings = ResourceService::<Booking>::new(Arc::clone(&docs));

        let input = BookingInput {
            event_id: ObjectId::new().to_hex(),
            attendee_id: ObjectId::new().to_hex(),
            tickets: 2,
            booking_date: "2026-01-01".into(),
        };
        assert!(matches!(
            bookings.create(input.clone()).await,
            Err(ServiceError::NotFound(EntityKind::Event))
        ));

        let attendees = ResourceService::<Attendee>::new(Arc::clone(&docs));
        let attendee = attendees
            .create(AttendeeInput {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                phone: None,
            })
            .await
            .unwrap();
        let input = BookingInput {
            event_id: "broken".into(),
            attendee_id: attendee.id.to_hex(),
            ..input
        };
        assert!(matches!(
            bookings.create(input).await,
            Err(ServiceError::InvalidId(EntityKind::Event))
        ));
    }

    #[tokio::test]
    async fn booking_tickets_are_not_capped_by_event_capacity() {
        let docs = store();
        let venues = ResourceService::<Venue>::new(Arc::clone(&docs));
        let events = ResourceService::<Event>::new(Arc::clone(&docs));
        let attendees = ResourceService::<Attendee>::new(Arc::clone(&docs));
        let bookings = ResourceService::<Booking>::new(Arc::clone(&docs));

        let venue = venues.create(hall()).await.unwrap();
        let event = events.create(launch(venue.id.to_hex())).await.unwrap();
        let attendee = attendees
            .create(AttendeeInput {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                phone: Some("555-0100".into()),
            })
            .await
            .unwrap();

        let booking = bookings
            .create(BookingInput {
                event_id: event.id.to_hex(),
                attendee_id: attendee.id.to_hex(),
                tickets: event.max_attendees * 10,
                booking_date: "2026-01-01".into(),
            })
            .await
            .unwrap();
        assert_eq!(booking.tickets, 500);
    }

    #[tokio::test]
    async fn validation_failure_names_the_field() {
        let venues = ResourceService::<Venue>::new(store());
        let err = venues
            .create(VenueInput {
                capacity: 0,
                ..hall()
            })
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation { field, .. } => assert_eq!(field, "capacity"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_stored_documents_surface_as_data_integrity() {
        let docs = store();
        let id = docs
            .insert_one("venues", doc! { "name": "Half a venue" })
            .await
            .unwrap();
        let venues = ResourceService::<Venue>::new(docs);
        assert!(matches!(
            venues.get(&id.to_hex()).await,
            Err(ServiceError::Store(StoreError::DataIntegrity { .. }))
        ));
    }
}
