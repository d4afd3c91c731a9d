//! The fixed list of bookable meeting rooms.

use serde::Serialize;

/// Size class of a meeting room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomKind {
    Small,
    Medium,
    Large,
    Executive,
}

impl RoomKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomKind::Small => "small meeting room",
            RoomKind::Medium => "medium meeting room",
            RoomKind::Large => "large meeting room",
            RoomKind::Executive => "executive meeting room",
        }
    }
}

/// A meeting room that reservations can refer to by `roomNumber`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: &'static str,
    pub kind: RoomKind,
}

impl Room {
    /// Display label, e.g. `Room 101 (small meeting room)`.
    pub fn label(&self) -> String {
        format!("Room {} ({})", self.id, self.kind.as_str())
    }
}

pub static ROOMS: [Room; 7] = [
    Room { id: "101", kind: RoomKind::Small },
    Room { id: "102", kind: RoomKind::Small },
    Room { id: "201", kind: RoomKind::Medium },
    Room { id: "202", kind: RoomKind::Medium },
    Room { id: "301", kind: RoomKind::Large },
    Room { id: "302", kind: RoomKind::Large },
    Room { id: "401", kind: RoomKind::Executive },
];

/// Look up a room by its number.
pub fn find_room(id: &str) -> Option<&'static Room> {
    ROOMS.iter().find(|room| room.id == id)
}
