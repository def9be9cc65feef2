// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：抽取配置、原始抽取结果和 LP 结果
/// - 服务（services）：抽取策略选择和结果规范化
///
/// 领域层不做任何 I/O，只表达业务规则。
pub mod models;
pub mod services;
