//! Whitelist management page: vehicle table, add form and their controller.

use crate::api::ApiClient;
use crate::cancel::CancelToken;
use crate::console::Dialogs;
use crate::dom::Element;
use crate::types::{Reply, Vehicle};
use log::{error, info, warn};

pub const TABLE_ID: &str = "vehicle-table";
pub const FORM_ID: &str = "add-form";
pub const PLATE_FIELD_ID: &str = "plate";
pub const NOTE_FIELD_ID: &str = "note";

const ADD_FAILED: &str = "Failed to add vehicle";
const DELETE_FAILED: &str = "Failed to delete vehicle";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    Delete(String),
}

#[derive(Debug, Clone)]
pub struct VehicleTable {
    element: Element,
}

impl VehicleTable {
    pub fn new() -> Self {
        let head = Element::new("thead").with_child(
            Element::new("tr")
                .with_child(Element::new("th").with_text("Plate"))
                .with_child(Element::new("th").with_text("Note"))
                .with_child(Element::new("th").with_text("Actions")),
        );
        VehicleTable {
            element: Element::new("table")
                .with_id(TABLE_ID)
                .with_class("table")
                .with_child(head)
                .with_child(Element::new("tbody")),
        }
    }

    fn body(&self) -> Option<&Element> {
        self.element.first_by_tag("tbody")
    }

    /// Replaces every row with one per vehicle, in the given order.
    pub fn render(&mut self, vehicles: &[Vehicle]) {
        let body = match self.element.first_by_tag_mut("tbody") {
            Some(body) => body,
            None => return,
        };
        body.clear();
        for vehicle in vehicles {
            body.append(row(vehicle));
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &Element> {
        self.body().into_iter().flat_map(|body| body.elements())
    }

    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    /// Text of each cell of `row`, or `None` past the last row.
    pub fn cells(&self, row: usize) -> Option<Vec<String>> {
        self.rows()
            .nth(row)
            .map(|tr| tr.elements().map(Element::text_content).collect())
    }

    /// Resolves a click on `row`'s delete control from its `data-plate`.
    pub fn action_at(&self, row: usize) -> Option<TableAction> {
        let tr = self.rows().nth(row)?;
        let button = tr.first_by_tag("button")?;
        match button.attr("data-action") {
            Some("delete") => button
                .attr("data-plate")
                .map(|plate| TableAction::Delete(plate.to_string())),
            _ => None,
        }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl Default for VehicleTable {
    fn default() -> Self {
        VehicleTable::new()
    }
}

fn row(vehicle: &Vehicle) -> Element {
    let button = Element::new("button")
        .with_class("btn btn-danger btn-sm")
        .with_attr("data-action", "delete")
        .with_attr("data-plate", &vehicle.plate)
        .with_text("Delete");
    Element::new("tr")
        .with_attr("data-plate", &vehicle.plate)
        .with_child(Element::new("td").with_text(&vehicle.plate))
        .with_child(Element::new("td").with_text(&vehicle.note))
        .with_child(Element::new("td").with_child(button))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    plate: String,
    note: String,
}

impl AddForm {
    pub fn set_plate(&mut self, value: &str) {
        self.plate = value.to_string();
    }

    pub fn set_note(&mut self, value: &str) {
        self.note = value.to_string();
    }

    /// The trimmed record to submit; `None` when the plate is blank.
    pub fn submission(&self) -> Option<Vehicle> {
        let plate = self.plate.trim();
        if plate.is_empty() {
            return None;
        }
        Some(Vehicle::new(plate, self.note.trim()))
    }

    pub fn reset(&mut self) {
        self.plate.clear();
        self.note.clear();
    }

    pub fn element(&self) -> Element {
        Element::new("form")
            .with_id(FORM_ID)
            .with_child(
                Element::new("input")
                    .with_id(PLATE_FIELD_ID)
                    .with_attr("name", "plate")
                    .with_attr("value", &self.plate),
            )
            .with_child(
                Element::new("input")
                    .with_id(NOTE_FIELD_ID)
                    .with_attr("name", "note")
                    .with_attr("value", &self.note),
            )
            .with_child(
                Element::new("button")
                    .with_attr("type", "submit")
                    .with_text("Add"),
            )
    }
}

/// Result of one user action on the admin page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Blank plate, declined confirmation or a click on nothing.
    Ignored,
    Message(String),
    Error(String),
    /// The server answered with neither `message` nor `error`.
    Unrecognized,
    /// Transport or parse failure.
    Failed,
}

pub struct VehicleAdmin<D> {
    api: ApiClient,
    dialogs: D,
    table: VehicleTable,
    form: AddForm,
    cancel: CancelToken,
}

impl<D: Dialogs> VehicleAdmin<D> {
    /// Builds the page and loads the list straight away.
    pub async fn mount(api: ApiClient, dialogs: D) -> Self {
        let mut admin = VehicleAdmin {
            api,
            dialogs,
            table: VehicleTable::new(),
            form: AddForm::default(),
            cancel: CancelToken::new(),
        };
        admin.load().await;
        admin
    }

    pub fn table(&self) -> &VehicleTable {
        &self.table
    }

    pub fn form(&self) -> &AddForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AddForm {
        &mut self.form
    }

    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    pub fn dialogs_mut(&mut self) -> &mut D {
        &mut self.dialogs
    }

    pub fn element(&self) -> Element {
        Element::new("section")
            .with_child(self.form.element())
            .with_child(self.table.element().clone())
    }

    /// Fetches the list and replaces the table. On failure the previous
    /// rows stay visible.
    pub async fn load(&mut self) -> bool {
        match self.api.list_vehicles(&self.cancel).await {
            Ok(vehicles) => {
                info!("Loaded {} vehicles", vehicles.len());
                self.table.render(&vehicles);
                true
            }
            Err(e) => {
                error!("Failed to load vehicles: {}", e);
                false
            }
        }
    }

    pub async fn submit(&mut self) -> Outcome {
        let vehicle = match self.form.submission() {
            Some(vehicle) => vehicle,
            None => return Outcome::Ignored,
        };
        info!("Adding plate {}", vehicle.plate);
        match self.api.add_vehicle(&vehicle, &self.cancel).await {
            Ok(Reply::Message(message)) => {
                self.dialogs.alert(&message);
                self.load().await;
                self.form.reset();
                Outcome::Message(message)
            }
            Ok(Reply::Error(text)) => self.rejected(text),
            Ok(Reply::Silent) => Outcome::Unrecognized,
            Err(e) => {
                warn!("Add request for {} failed: {}", vehicle.plate, e);
                self.dialogs.alert(ADD_FAILED);
                Outcome::Failed
            }
        }
    }

    pub async fn delete(&mut self, plate: &str) -> Outcome {
        if !self.dialogs.confirm(&format!("Delete plate {}?", plate)) {
            return Outcome::Ignored;
        }
        info!("Deleting plate {}", plate);
        match self.api.delete_vehicle(plate, &self.cancel).await {
            Ok(Reply::Message(message)) => {
                self.dialogs.alert(&message);
                self.load().await;
                Outcome::Message(message)
            }
            Ok(Reply::Error(text)) => self.rejected(text),
            Ok(Reply::Silent) => Outcome::Unrecognized,
            Err(e) => {
                warn!("Delete request for {} failed: {}", plate, e);
                self.dialogs.alert(DELETE_FAILED);
                Outcome::Failed
            }
        }
    }

    /// Delegated click handler for the table body.
    pub async fn click(&mut self, row: usize) -> Outcome {
        match self.table.action_at(row) {
            Some(TableAction::Delete(plate)) => self.delete(&plate).await,
            None => Outcome::Ignored,
        }
    }

    fn rejected(&mut self, text: String) -> Outcome {
        self.dialogs.alert(&text);
        Outcome::Error(text)
    }

    /// Aborts any request still in flight; the page is unusable afterwards.
    pub fn unmount(self) -> D {
        self.cancel.cancel();
        self.dialogs
    }
}
