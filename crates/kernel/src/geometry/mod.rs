pub mod obb;
pub mod point;
pub mod pose;
pub mod transform;
pub mod vector;
