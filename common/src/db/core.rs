use crate::db::indices::*;
use crate::geom::point::Point;
use crate::geom::rect::Rect;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    N,
    S,
    E,
    W,
    Fn,
    Fs,
    Fe,
    Fw,
}

impl Orientation {
    pub fn parse(tag: &str) -> Option<Orientation> {
        match tag {
            "N" => Some(Orientation::N),
            "S" => Some(Orientation::S),
            "E" => Some(Orientation::E),
            "W" => Some(Orientation::W),
            "FN" | "F" => Some(Orientation::Fn),
            "FS" => Some(Orientation::Fs),
            "FE" => Some(Orientation::Fe),
            "FW" => Some(Orientation::Fw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::N => "N",
            Orientation::S => "S",
            Orientation::E => "E",
            Orientation::W => "W",
            Orientation::Fn => "FN",
            Orientation::Fs => "FS",
            Orientation::Fe => "FE",
            Orientation::Fw => "FW",
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::N
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinDirection {
    Input,
    Output,
    Bidirectional,
}

impl PinDirection {
    pub fn parse(tag: &str) -> PinDirection {
        match tag {
            "O" => PinDirection::Output,
            "B" => PinDirection::Bidirectional,
            _ => PinDirection::Input,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub orientation: Orientation,
    pub is_fixed: bool,
    pub pins: Vec<PinId>,
}

impl Node {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[derive(Clone, Debug)]
pub struct Net {
    pub name: String,
    pub weight: f64,
    pub pins: Vec<PinId>,
}

impl Net {
    pub fn degree(&self) -> usize {
        self.pins.len()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Row {
    pub y: f64,
    pub height: f64,
    pub x_origin: f64,
    pub num_sites: u32,
    pub site_width: f64,
}

impl Row {
    pub fn extent(&self) -> (f64, f64) {
        (
            self.x_origin,
            self.x_origin + self.num_sites as f64 * self.site_width,
        )
    }
}

/// The central, read-mostly netlist model. Built top-down by the Bookshelf
/// reader, then treated as frozen by every downstream stage.
pub struct Design {
    pub nodes: Vec<Node>,
    pub nets: Vec<Net>,
    pub rows: Vec<Row>,

    pub pin_to_cell: Vec<CellId>,
    pub pin_to_net: Vec<NetId>,
    pub pin_direction: Vec<PinDirection>,
    pub pin_offset: Vec<Point<f64>>,

    /// Declaration-order index of every movable node; matrix row i in the
    /// quadratic system corresponds to `movable_index[i]`.
    pub movable_index: Vec<CellId>,
    pub fixed_index: Vec<CellId>,

    pub core: Rect,

    pub name_map: HashMap<String, CellId>,
    pub net_name_map: HashMap<String, NetId>,
}

impl Design {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            nets: Vec::new(),
            rows: Vec::new(),
            pin_to_cell: Vec::new(),
            pin_to_net: Vec::new(),
            pin_direction: Vec::new(),
            pin_offset: Vec::new(),
            movable_index: Vec::new(),
            fixed_index: Vec::new(),
            core: Rect::default(),
            name_map: HashMap::new(),
            net_name_map: HashMap::new(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_nets(&self) -> usize {
        self.nets.len()
    }

    pub fn num_movable(&self) -> usize {
        self.movable_index.len()
    }

    pub fn add_node(&mut self, name: String, width: f64, height: f64, is_fixed: bool) -> CellId {
        let id = CellId::new(self.nodes.len());
        self.nodes.push(Node {
            name: name.clone(),
            width,
            height,
            x: 0.0,
            y: 0.0,
            orientation: Orientation::N,
            is_fixed,
            pins: Vec::new(),
        });
        self.name_map.insert(name, id);
        id
    }

    pub fn add_net(&mut self, name: String) -> NetId {
        if let Some(&id) = self.net_name_map.get(&name) {
            return id;
        }
        let id = NetId::new(self.nets.len());
        self.nets.push(Net {
            name: name.clone(),
            weight: 1.0,
            pins: Vec::new(),
        });
        self.net_name_map.insert(name, id);
        id
    }

    pub fn add_pin(
        &mut self,
        cell: CellId,
        net: NetId,
        direction: PinDirection,
        offset: Point<f64>,
    ) -> PinId {
        let pid = PinId::new(self.pin_to_cell.len());
        self.pin_to_cell.push(cell);
        self.pin_to_net.push(net);
        self.pin_direction.push(direction);
        self.pin_offset.push(offset);

        self.nodes[cell.index()].pins.push(pid);
        self.nets[net.index()].pins.push(pid);
        pid
    }

    /// Recomputes `movable_index`/`fixed_index` from the current `is_fixed`
    /// flags. Must run once after `.pl` has been merged into `.nodes`, since
    /// `/FIXED` can override the movable/terminal split declared in `.nodes`.
    pub fn reindex_movable(&mut self) {
        self.movable_index.clear();
        self.fixed_index.clear();
        for (i, node) in self.nodes.iter().enumerate() {
            let id = CellId::new(i);
            if node.is_fixed {
                self.fixed_index.push(id);
            } else {
                self.movable_index.push(id);
            }
        }
    }

    pub fn pin_position(&self, pin: PinId) -> Point<f64> {
        let cell = self.pin_to_cell[pin.index()];
        let node = &self.nodes[cell.index()];
        Point::new(node.x, node.y) + self.pin_offset[pin.index()]
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}
