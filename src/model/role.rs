#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Staff = 1,
    Director = 2,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Staff),
            2 => Some(Role::Director),
            _ => None,
        }
    }
}
